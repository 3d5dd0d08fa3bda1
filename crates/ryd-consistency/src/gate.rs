//! Payout gate — the blocking contract over open split mismatches.
//!
//! Any workflow finalizing a payout for an artist with an open, unresolved
//! value mismatch must either refuse to finalize or require explicit human
//! override before release.  A missing-in-registry finding is non-blocking:
//! the payout may proceed but must be tagged provisional.

use crate::checker::{SplitMismatch, SplitMismatchKind};

/// Result of a payout gate check for one artist.
#[derive(Clone, Debug, PartialEq)]
pub enum PayoutGate {
    /// No open findings — the payout may be finalized.
    Permitted,
    /// Contract paperwork is pending (missing in registry) — the payout may
    /// be released but must be tagged provisional.
    Provisional,
    /// An open value mismatch — finalization is blocked pending human
    /// override.  The embedded mismatch carries the evidence for audit.
    Blocked { mismatch: SplitMismatch },
}

impl PayoutGate {
    /// `true` when the payout may be released (permitted or provisional).
    pub fn is_releasable(&self) -> bool {
        !matches!(self, PayoutGate::Blocked { .. })
    }

    /// `true` when finalization is blocked pending human override.
    pub fn is_blocked(&self) -> bool {
        !self.is_releasable()
    }
}

/// Gate check for one artist against the open (unresolved) mismatch list.
///
/// Call this immediately before finalizing the artist's payout.  If
/// [`PayoutGate::Blocked`] is returned, the payout must not be released
/// without explicit human override.
pub fn check_payout_gate(artist: &str, open_mismatches: &[SplitMismatch]) -> PayoutGate {
    let mut pending_contract = false;

    for mismatch in open_mismatches.iter().filter(|m| m.artist == artist) {
        match mismatch.kind {
            SplitMismatchKind::ValueMismatch => {
                return PayoutGate::Blocked {
                    mismatch: mismatch.clone(),
                }
            }
            SplitMismatchKind::MissingInRegistry => pending_contract = true,
        }
    }

    if pending_contract {
        PayoutGate::Provisional
    } else {
        PayoutGate::Permitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ryd_money::ShareFraction;

    fn mismatch(artist: &str, kind: SplitMismatchKind) -> SplitMismatch {
        SplitMismatch {
            artist: artist.to_string(),
            kind,
            engine_fraction: ShareFraction::from_percent(60).unwrap(),
            registry_fraction: match kind {
                SplitMismatchKind::ValueMismatch => Some(0.65),
                SplitMismatchKind::MissingInRegistry => None,
            },
        }
    }

    #[test]
    fn no_findings_is_permitted() {
        let gate = check_payout_gate("Nova", &[]);
        assert_eq!(gate, PayoutGate::Permitted);
        assert!(gate.is_releasable());
    }

    #[test]
    fn value_mismatch_blocks() {
        let open = vec![mismatch("Nova", SplitMismatchKind::ValueMismatch)];
        let gate = check_payout_gate("Nova", &open);
        assert!(gate.is_blocked());
        match gate {
            PayoutGate::Blocked { mismatch } => assert_eq!(mismatch.artist, "Nova"),
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn missing_in_registry_is_provisional_not_blocked() {
        let open = vec![mismatch("Nova", SplitMismatchKind::MissingInRegistry)];
        let gate = check_payout_gate("Nova", &open);
        assert_eq!(gate, PayoutGate::Provisional);
        assert!(gate.is_releasable());
    }

    #[test]
    fn value_mismatch_wins_over_missing_in_registry() {
        let open = vec![
            mismatch("Nova", SplitMismatchKind::MissingInRegistry),
            mismatch("Nova", SplitMismatchKind::ValueMismatch),
        ];
        assert!(check_payout_gate("Nova", &open).is_blocked());
    }

    #[test]
    fn other_artists_findings_do_not_block() {
        let open = vec![mismatch("Juno", SplitMismatchKind::ValueMismatch)];
        assert_eq!(check_payout_gate("Nova", &open), PayoutGate::Permitted);
    }
}
