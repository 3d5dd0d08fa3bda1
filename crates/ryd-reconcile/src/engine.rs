use std::collections::BTreeMap;

use ryd_engine::Payout;
use ryd_money::Money;

use crate::types::{DiscrepancyKind, DiscrepancyRecord};

/// Compare computed payouts against externally reported actual payments.
///
/// For each computed payout:
/// - no entry in `actual` → [`DiscrepancyKind::MissingActual`]
/// - an entry differing from `net_payout` by any non-zero amount (exact
///   comparison) → [`DiscrepancyKind::AmountMismatch`] carrying the signed
///   `actual - computed` difference
///
/// Artists present in `actual` but absent from `computed` are NOT reported:
/// they are outside this engine's revenue scope and belong to whichever
/// collaborator supplied the actuals.  That asymmetry is the contract, not
/// an oversight.
///
/// Pure and deterministic; output order follows `computed` (which the
/// engine emits artist-sorted).
pub fn reconcile(
    period: &str,
    computed: &[Payout],
    actual: &BTreeMap<String, Money>,
) -> Vec<DiscrepancyRecord> {
    let mut discrepancies = Vec::new();

    for payout in computed {
        match actual.get(&payout.artist) {
            None => discrepancies.push(DiscrepancyRecord {
                artist: payout.artist.clone(),
                period: period.to_string(),
                kind: DiscrepancyKind::MissingActual,
                computed: payout.net_payout,
                actual: None,
                difference: None,
            }),
            Some(&paid) if paid != payout.net_payout => {
                discrepancies.push(DiscrepancyRecord {
                    artist: payout.artist.clone(),
                    period: period.to_string(),
                    kind: DiscrepancyKind::AmountMismatch,
                    computed: payout.net_payout,
                    actual: Some(paid),
                    difference: Some(paid - payout.net_payout),
                });
            }
            Some(_) => {}
        }
    }

    discrepancies
}
