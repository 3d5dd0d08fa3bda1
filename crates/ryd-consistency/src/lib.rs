//! ryd-consistency
//!
//! Split consistency: the share table the engine pays from vs. the share
//! table the signed contracts record.  Two independently maintained sources
//! of truth — disagreement is surfaced, never guessed away.
//!
//! Architectural decisions:
//! - A value mismatch is a **blocking** condition: payout finalization for
//!   that artist requires explicit human override (see [`check_payout_gate`])
//! - An artist missing from the registry is informational — they may be
//!   paid under an ad-hoc fraction while paperwork is pending, tagged
//!   provisional
//! - Registry-only artists are not reported; the engine's view is
//!   authoritative for who is being paid right now
//!
//! Deterministic, pure logic. No IO.

mod checker;
mod gate;

pub use checker::{verify, SplitMismatch, SplitMismatchKind, SPLIT_EPSILON};
pub use gate::{check_payout_gate, PayoutGate};
