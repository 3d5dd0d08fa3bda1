use std::collections::BTreeMap;

use serde::Serialize;

use ryd_money::ShareFraction;

/// Absolute tolerance when comparing the engine's exact fraction against
/// the registry's float fraction.  Wide enough to absorb float noise in the
/// registry's source format, narrow enough to catch a real
/// percentage-point disagreement (0.60 vs 0.65).
pub const SPLIT_EPSILON: f64 = 0.001;

/// What kind of disagreement was observed for one artist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMismatchKind {
    /// The engine pays this artist but the registry has no contract entry.
    /// Informational: payment may proceed provisionally.
    MissingInRegistry,
    /// Both sides have a fraction and they disagree beyond
    /// [`SPLIT_EPSILON`].  Blocking: see the payout gate.
    ValueMismatch,
}

/// One consistency finding.  Produced, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SplitMismatch {
    pub artist: String,
    pub kind: SplitMismatchKind,
    /// What the engine would pay with.
    pub engine_fraction: ShareFraction,
    /// What the contract records, when an entry exists.
    pub registry_fraction: Option<f64>,
}

/// Compare the engine's share snapshot against a contract-registry
/// snapshot.
///
/// For each artist tracked by the engine:
/// - absent from the registry → [`SplitMismatchKind::MissingInRegistry`]
/// - present with `|engine - registry| > SPLIT_EPSILON` →
///   [`SplitMismatchKind::ValueMismatch`] carrying both fractions
///
/// Artists present only in the registry (not yet onboarded) are not
/// reported.  Output is artist-sorted (snapshot iteration order).
pub fn verify(
    engine_shares: &BTreeMap<String, ShareFraction>,
    registry_shares: &BTreeMap<String, f64>,
) -> Vec<SplitMismatch> {
    let mut mismatches = Vec::new();

    for (artist, &engine_fraction) in engine_shares {
        match registry_shares.get(artist) {
            None => mismatches.push(SplitMismatch {
                artist: artist.clone(),
                kind: SplitMismatchKind::MissingInRegistry,
                engine_fraction,
                registry_fraction: None,
            }),
            Some(&registry_fraction) => {
                if (engine_fraction.as_f64() - registry_fraction).abs() > SPLIT_EPSILON {
                    mismatches.push(SplitMismatch {
                        artist: artist.clone(),
                        kind: SplitMismatchKind::ValueMismatch,
                        engine_fraction,
                        registry_fraction: Some(registry_fraction),
                    });
                }
            }
        }
    }

    mismatches
}
