//! ryd-money
//!
//! Exact fixed-point money and share-fraction types used everywhere in the
//! royalty core.
//!
//! Architectural decisions:
//! - Money is `i64` micros (1 unit = 1_000_000 micros); no floating point
//!   anywhere on the payout path
//! - Share fractions are `i64` parts-per-million, constrained to [0, 1]
//! - Splitting rounds **half-up to cents** (0.005 always rounds up, never
//!   to even) — the finance-department convention, reproducible on every
//!   platform
//! - Serialization is a canonical decimal string so persistence layers
//!   round-trip amounts losslessly, never through `f64`
//!
//! Deterministic, pure logic. No IO.

mod fraction;
mod money;

pub use fraction::{ShareFraction, FRACTION_SCALE};
pub use money::{Money, ParseMoneyError, MICROS_PER_CENT, MICROS_PER_UNIT};

/// Range violations on money or fraction construction.
///
/// Always local and caller-correctable: the value was rejected before it
/// could reach any table or ledger, so no state was mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutOfRangeError {
    /// A share fraction outside the closed interval [0, 1].
    FractionOutOfRange { ppm: i64 },
    /// A balance that would be negative.
    NegativeBalance { micros: i64 },
}

impl std::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FractionOutOfRange { ppm } => write!(
                f,
                "share fraction must be within [0, 1], got {} ppm",
                ppm
            ),
            Self::NegativeBalance { micros } => {
                write!(f, "balance must be non-negative, got {} micros", micros)
            }
        }
    }
}

impl std::error::Error for OutOfRangeError {}
