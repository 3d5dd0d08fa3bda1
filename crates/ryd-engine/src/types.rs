use serde::{Deserialize, Serialize};

use ryd_money::{Money, ShareFraction};

/// One reported unit of income from the (already deduplicated,
/// single-currency) revenue feed.  Immutable once ingested; borrowed by the
/// engine for the duration of one `compute` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub artist: String,
    #[serde(default)]
    pub track: Option<String>,
    pub platform: String,
    pub country: String,
    /// Accounting period identifier, e.g. `"2026-Q2"`.
    pub period: String,
    pub streams: u64,
    pub revenue: Money,
}

/// The computed result for one (artist, period) pair.
///
/// Invariants (enforced by construction in the engine):
/// - `net_payout == artist_share - advance_deducted`
/// - `advance_deducted <= artist_share`
/// - `advance_deducted <=` the pre-computation advance balance
///
/// Payouts are derived values, recomputed fresh on every call — never the
/// source of truth for shares or advances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub artist: String,
    pub period: String,
    pub gross_revenue: Money,
    pub share_fraction: ShareFraction,
    pub artist_share: Money,
    pub advance_deducted: Money,
    pub net_payout: Money,
    pub track_count: usize,
    pub stream_count: u64,
    /// `true` when the share used is ad-hoc (contract paperwork pending).
    /// Provisional payouts may be released but must be flagged as such.
    pub provisional: bool,
}

/// Soft, per-artist conditions surfaced alongside the payout batch.
///
/// Warnings are data, not errors: one artist's missing split must not abort
/// computation for the others, and callers must distinguish "no artists had
/// revenue" from "no artists had splits" via this channel, not via output
/// emptiness alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComputeWarning {
    /// The artist had revenue rows but no share table entry; they were
    /// skipped from the result set.
    MissingSplit { artist: String },
}

impl std::fmt::Display for ComputeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSplit { artist } => {
                write!(f, "no split set for artist {artist:?}; skipped from batch")
            }
        }
    }
}

/// Full result of one `compute` call: payouts plus the warning channel.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize)]
pub struct ComputeOutcome {
    pub payouts: Vec<Payout>,
    pub warnings: Vec<ComputeWarning>,
}

impl ComputeOutcome {
    /// `true` when every artist with revenue produced a payout.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
