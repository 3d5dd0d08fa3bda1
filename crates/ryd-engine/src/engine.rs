use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use ryd_advances::{AdvanceLedger, AdvanceStatus};
use ryd_money::Money;
use ryd_shares::{ShareProvenance, ShareTable};

use crate::sources::{ComputeError, RevenueSource};
use crate::types::{ComputeOutcome, ComputeWarning, Payout, RevenueRecord};

/// Per-artist accumulation over the partitioned revenue rows.
#[derive(Default)]
struct ArtistTotals {
    gross: Money,
    streams: u64,
    tracks: BTreeSet<String>,
}

/// The royalty engine.  Exclusively owns the share table and the advance
/// ledger it computes against (single writer); revenue rows are borrowed
/// per call and never retained.
#[derive(Clone, Debug, Default)]
pub struct RoyaltyEngine {
    shares: ShareTable,
    advances: AdvanceLedger,
}

impl RoyaltyEngine {
    pub fn new(shares: ShareTable, advances: AdvanceLedger) -> Self {
        Self { shares, advances }
    }

    pub fn shares(&self) -> &ShareTable {
        &self.shares
    }

    /// Mutable access for split updates.  `ShareTable::set` appends its
    /// audit entry within the same exclusive borrow.
    pub fn shares_mut(&mut self) -> &mut ShareTable {
        &mut self.shares
    }

    pub fn advances(&self) -> &AdvanceLedger {
        &self.advances
    }

    /// Mutable access for advance top-ups and post-finalization settlement.
    pub fn advances_mut(&mut self) -> &mut AdvanceLedger {
        &mut self.advances
    }

    /// Compute per-artist payouts for one accounting period.
    ///
    /// - Rows whose `period` differs are ignored; `artist_filter` (when
    ///   given) restricts the batch to one artist.  An empty result is
    ///   valid output, not an error.
    /// - Gross revenue is summed with exact fixed-point addition, the share
    ///   is applied with half-up rounding to cents, and the advance is
    ///   netted read-only: `deducted = min(outstanding, share)`.
    /// - An artist with no split entry is skipped and reported on the
    ///   warning channel; the batch continues.
    ///
    /// Pure over the engine's state — the ledger is **not** mutated, so the
    /// call is idempotent.  Payouts come back artist-sorted.
    pub fn compute(
        &self,
        period: &str,
        revenue_rows: &[RevenueRecord],
        artist_filter: Option<&str>,
    ) -> ComputeOutcome {
        let mut by_artist: BTreeMap<&str, ArtistTotals> = BTreeMap::new();

        for row in revenue_rows {
            if row.period != period {
                continue;
            }
            if let Some(only) = artist_filter {
                if row.artist != only {
                    continue;
                }
            }
            let totals = by_artist.entry(row.artist.as_str()).or_default();
            totals.gross += row.revenue;
            totals.streams += row.streams;
            if let Some(track) = &row.track {
                totals.tracks.insert(track.clone());
            }
        }

        let mut outcome = ComputeOutcome::default();

        for (artist, totals) in by_artist {
            let record = match self.shares.record(artist) {
                Some(record) => record,
                None => {
                    warn!(artist, period, "no split set, skipping artist");
                    outcome.warnings.push(ComputeWarning::MissingSplit {
                        artist: artist.to_string(),
                    });
                    continue;
                }
            };

            let artist_share = totals.gross.apply_fraction_half_up(record.fraction);
            let outstanding = self.advances.get(artist);
            let advance_deducted = outstanding.min(artist_share);
            let net_payout = artist_share - advance_deducted;

            outcome.payouts.push(Payout {
                artist: artist.to_string(),
                period: period.to_string(),
                gross_revenue: totals.gross,
                share_fraction: record.fraction,
                artist_share,
                advance_deducted,
                net_payout,
                track_count: totals.tracks.len(),
                stream_count: totals.streams,
                provisional: record.provenance == ShareProvenance::AdHoc,
            });
        }

        outcome
    }

    /// Fetch rows from a wired-in revenue source, then [`compute`].
    ///
    /// # Errors
    /// [`ComputeError::ConfigurationMissing`] when no source is wired in;
    /// [`ComputeError::Source`] when the fetch itself fails.
    ///
    /// [`compute`]: RoyaltyEngine::compute
    pub fn compute_from_source(
        &self,
        source: Option<&dyn RevenueSource>,
        period: &str,
        artist_filter: Option<&str>,
    ) -> Result<ComputeOutcome, ComputeError> {
        let source = source.ok_or(ComputeError::ConfigurationMissing {
            collaborator: "revenue source",
        })?;
        let rows = source
            .fetch(period)
            .map_err(|source| ComputeError::Source { source })?;
        Ok(self.compute(period, &rows, artist_filter))
    }

    /// Advance summary for one artist (remaining balance + status).
    pub fn artist_balance(&self, artist: &str) -> AdvanceStatus {
        self.advances.status(artist)
    }
}
