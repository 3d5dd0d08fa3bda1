use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::OutOfRangeError;

/// Parts-per-million scale for share fractions (1.0 = 1_000_000 ppm).
pub const FRACTION_SCALE: i64 = 1_000_000;

/// A revenue-share fraction in the closed interval [0, 1], stored exactly
/// as parts-per-million.
///
/// The engine side of the system never holds a float fraction; `f64` only
/// appears at the boundary with the contract registry, whose source format
/// carries float noise (see the consistency checker's epsilon).
///
/// Serializes as the raw ppm integer; deserialization re-validates the
/// range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShareFraction(i64);

impl ShareFraction {
    /// Zero share (artist receives nothing).
    pub const ZERO: ShareFraction = ShareFraction(0);

    /// Full share (artist receives everything).
    pub const ONE: ShareFraction = ShareFraction(FRACTION_SCALE);

    /// Construct from parts-per-million.
    ///
    /// # Errors
    /// [`OutOfRangeError::FractionOutOfRange`] unless `0 <= ppm <= 1_000_000`.
    pub fn from_ppm(ppm: i64) -> Result<Self, OutOfRangeError> {
        if (0..=FRACTION_SCALE).contains(&ppm) {
            Ok(ShareFraction(ppm))
        } else {
            Err(OutOfRangeError::FractionOutOfRange { ppm })
        }
    }

    /// Construct from whole percent (e.g. `from_percent(70)` is 0.70).
    ///
    /// # Errors
    /// [`OutOfRangeError::FractionOutOfRange`] unless `0 <= percent <= 100`.
    pub fn from_percent(percent: i64) -> Result<Self, OutOfRangeError> {
        Self::from_ppm(percent.saturating_mul(FRACTION_SCALE / 100))
    }

    /// Construct from an `f64` in [0, 1], rounding to the nearest ppm.
    ///
    /// Used where fractions arrive from external float-bearing formats
    /// (CLI arguments, registry snapshots being onboarded).
    ///
    /// # Errors
    /// [`OutOfRangeError::FractionOutOfRange`] for NaN or values outside
    /// [0, 1].
    pub fn from_f64(value: f64) -> Result<Self, OutOfRangeError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(OutOfRangeError::FractionOutOfRange {
                ppm: (value * FRACTION_SCALE as f64) as i64,
            });
        }
        Self::from_ppm((value * FRACTION_SCALE as f64).round() as i64)
    }

    /// The raw parts-per-million value.
    #[inline]
    pub const fn as_ppm(self) -> i64 {
        self.0
    }

    /// Lossy `f64` view, for comparison against external float snapshots
    /// only — never used in payout arithmetic.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / FRACTION_SCALE as f64
    }
}

impl fmt::Display for ShareFraction {
    /// Decimal fraction with six places (`0.700000`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.0 / FRACTION_SCALE, self.0 % FRACTION_SCALE)
    }
}

impl Serialize for ShareFraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for ShareFraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ppm = i64::deserialize(deserializer)?;
        ShareFraction::from_ppm(ppm).map_err(de::Error::custom)
    }
}
