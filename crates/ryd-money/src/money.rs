use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::fraction::{ShareFraction, FRACTION_SCALE};

/// Micros per one currency unit (1.00 = 1_000_000 micros).
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Micros per cent (0.01 = 10_000 micros).
pub const MICROS_PER_CENT: i64 = 10_000;

/// A fixed-point monetary amount at 1e-6 scale (micros), in the label's
/// base currency.
///
/// # Construction
///
/// Use [`Money::from_micros`], [`Money::from_major_units`] or
/// [`Money::from_cents`].  There is intentionally no `From<i64>`
/// implementation — callers must be deliberate about when a raw integer
/// represents a monetary amount.
///
/// # Serialization
///
/// Serializes as a canonical decimal string (`"7000.00"`, `"1.234567"`
/// only if a sub-cent residue exists) and deserializes from the same
/// format.  Amounts never pass through `f64`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero monetary amount.
    pub const ZERO: Money = Money(0);

    /// Construct from a raw micros value.
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Money(micros)
    }

    /// Construct from whole currency units (e.g. `from_major_units(500)` is
    /// 500.00).
    #[inline]
    pub const fn from_major_units(units: i64) -> Self {
        Money(units * MICROS_PER_UNIT)
    }

    /// Construct from a cent count (e.g. `from_cents(12345)` is 123.45).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents * MICROS_PER_CENT)
    }

    /// The underlying raw micros value.
    #[inline]
    pub const fn micros(self) -> i64 {
        self.0
    }

    /// Saturating addition — clamps at `i64::MAX` micros on overflow.
    #[inline]
    pub fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction — clamps at `i64::MIN` micros on underflow.
    #[inline]
    pub fn saturating_sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }

    /// Checked addition.
    #[inline]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// The smaller of two amounts.
    #[inline]
    pub fn min(self, rhs: Money) -> Money {
        if self.0 <= rhs.0 {
            self
        } else {
            rhs
        }
    }

    /// Absolute value.  Saturates for `i64::MIN` micros.
    #[inline]
    pub fn abs(self) -> Money {
        Money(self.0.saturating_abs())
    }

    /// `true` if this amount is strictly negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `true` if this amount is non-negative.
    #[inline]
    pub fn is_non_negative(self) -> bool {
        self.0 >= 0
    }

    /// `true` if this amount is exactly zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `true` if this amount is strictly positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Apply a share fraction, rounding **half-up to cents**.
    ///
    /// The product is computed exactly in `i128` (micros × ppm), then
    /// rounded to whole cents with ties going away from zero.  Banker's
    /// rounding is deliberately not used: 0.005 must always round to 0.01
    /// so results are reproducible regardless of platform.
    ///
    /// The result is always cent-aligned (a multiple of
    /// [`MICROS_PER_CENT`]).
    pub fn apply_fraction_half_up(self, fraction: ShareFraction) -> Money {
        let num = (self.0.unsigned_abs() as i128) * (fraction.as_ppm() as i128);
        let denom = (FRACTION_SCALE as i128) * (MICROS_PER_CENT as i128);
        let cents = (num + denom / 2) / denom;
        // Fits: fraction ≤ 1, so the result is bounded by |self|.
        let micros = (cents * (MICROS_PER_CENT as i128)) as i64;
        // Ties round away from zero for negative amounts too (matching the
        // half-up convention on adjustment rows).
        if self.0 < 0 {
            Money(-micros)
        } else {
            Money(micros)
        }
    }
}

impl Add for Money {
    type Output = Money;
    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    #[inline]
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;
    #[inline]
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

// ---------------------------------------------------------------------------
// Display / parse (canonical decimal string)
// ---------------------------------------------------------------------------

impl fmt::Display for Money {
    /// Canonical decimal: two decimal places when the amount is
    /// cent-aligned, six when a sub-cent residue exists.  `Display` and
    /// `FromStr` round-trip exactly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / MICROS_PER_UNIT as u64;
        let micros = abs % MICROS_PER_UNIT as u64;
        if micros % MICROS_PER_CENT as u64 == 0 {
            write!(f, "{sign}{units}.{:02}", micros / MICROS_PER_CENT as u64)
        } else {
            write!(f, "{sign}{units}.{micros:06}")
        }
    }
}

/// Failure to parse a decimal money string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseMoneyError {
    /// Not a decimal number (`"12x.00"`, `""`, `".50"` with no integer part).
    Malformed { input: String },
    /// More than six fractional digits — sub-micro precision is not
    /// representable and silently dropping digits would lose money.
    TooManyDecimals { input: String },
    /// The amount does not fit in `i64` micros.
    Overflow { input: String },
}

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { input } => write!(f, "malformed money amount: {input:?}"),
            Self::TooManyDecimals { input } => {
                write!(f, "money amount has more than 6 decimal places: {input:?}")
            }
            Self::Overflow { input } => write!(f, "money amount out of range: {input:?}"),
        }
    }
}

impl std::error::Error for ParseMoneyError {}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseMoneyError::Malformed {
            input: s.to_string(),
        };
        let overflow = || ParseMoneyError::Overflow {
            input: s.to_string(),
        };

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, fr)) => (i, fr),
            None => (body, ""),
        };

        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if frac_part.len() > 6 {
            return Err(ParseMoneyError::TooManyDecimals {
                input: s.to_string(),
            });
        }

        let units: i64 = int_part.parse().map_err(|_| overflow())?;
        let mut frac_micros: i64 = 0;
        if !frac_part.is_empty() {
            frac_micros = frac_part.parse().map_err(|_| malformed())?;
            for _ in 0..(6 - frac_part.len()) {
                frac_micros *= 10;
            }
        }

        let micros = units
            .checked_mul(MICROS_PER_UNIT)
            .and_then(|m| m.checked_add(frac_micros))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -micros } else { micros }))
    }
}

// ---------------------------------------------------------------------------
// Serde (canonical decimal string, never f64)
// ---------------------------------------------------------------------------

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(ppm: i64) -> ShareFraction {
        ShareFraction::from_ppm(ppm).unwrap()
    }

    #[test]
    fn zero_is_additive_identity() {
        let a = Money::from_major_units(42);
        assert_eq!(a + Money::ZERO, a);
        assert_eq!(Money::ZERO + a, a);
    }

    #[test]
    fn add_and_sub_roundtrip() {
        let a = Money::from_major_units(100);
        let b = Money::from_cents(2_550);
        assert_eq!((a + b) - b, a);
    }

    #[test]
    fn min_picks_smaller() {
        let a = Money::from_major_units(1);
        let b = Money::from_major_units(2);
        assert_eq!(a.min(b), a);
        assert_eq!(b.min(a), a);
        assert_eq!(a.min(a), a);
    }

    #[test]
    fn apply_fraction_exact_seventy_percent() {
        // 10000.00 × 0.70 = 7000.00
        let gross = Money::from_major_units(10_000);
        assert_eq!(
            gross.apply_fraction_half_up(frac(700_000)),
            Money::from_major_units(7_000)
        );
    }

    #[test]
    fn apply_fraction_exact_eighty_percent() {
        // 500.00 × 0.80 = 400.00
        let gross = Money::from_major_units(500);
        assert_eq!(
            gross.apply_fraction_half_up(frac(800_000)),
            Money::from_major_units(400)
        );
    }

    #[test]
    fn half_cent_rounds_up_not_to_even() {
        // 0.01 × 0.5 = 0.005 → must round to 0.01, never to 0.00.
        let gross = Money::from_cents(1);
        assert_eq!(
            gross.apply_fraction_half_up(frac(500_000)),
            Money::from_cents(1)
        );
        // 0.03 × 0.5 = 0.015 → 0.02 (banker's would also give 0.02; check
        // the odd-target case too: 0.05 × 0.5 = 0.025 → 0.03, banker's
        // would give 0.02).
        let gross = Money::from_cents(5);
        assert_eq!(
            gross.apply_fraction_half_up(frac(500_000)),
            Money::from_cents(3)
        );
    }

    #[test]
    fn apply_fraction_result_is_cent_aligned() {
        let gross = Money::from_micros(1_234_567);
        let share = gross.apply_fraction_half_up(frac(333_333));
        assert_eq!(share.micros() % MICROS_PER_CENT, 0);
    }

    #[test]
    fn apply_fraction_zero_and_one() {
        let gross = Money::from_major_units(99);
        assert_eq!(gross.apply_fraction_half_up(frac(0)), Money::ZERO);
        assert_eq!(gross.apply_fraction_half_up(frac(1_000_000)), gross);
    }

    #[test]
    fn apply_fraction_is_deterministic() {
        let gross = Money::from_micros(987_654_321);
        let f = frac(654_321);
        assert_eq!(
            gross.apply_fraction_half_up(f),
            gross.apply_fraction_half_up(f)
        );
    }

    #[test]
    fn display_cent_aligned_uses_two_decimals() {
        assert_eq!(Money::from_major_units(7_000).to_string(), "7000.00");
        assert_eq!(Money::from_cents(12_345).to_string(), "123.45");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn display_sub_cent_uses_six_decimals() {
        assert_eq!(Money::from_micros(1_234_567).to_string(), "1.234567");
    }

    #[test]
    fn display_negative_below_one_unit_keeps_sign() {
        assert_eq!(Money::from_cents(-75).to_string(), "-0.75");
    }

    #[test]
    fn parse_two_decimal_amounts() {
        assert_eq!("10000.00".parse::<Money>(), Ok(Money::from_major_units(10_000)));
        assert_eq!("0.01".parse::<Money>(), Ok(Money::from_cents(1)));
        assert_eq!("-3.50".parse::<Money>(), Ok(Money::from_cents(-350)));
    }

    #[test]
    fn parse_bare_integer() {
        assert_eq!("500".parse::<Money>(), Ok(Money::from_major_units(500)));
    }

    #[test]
    fn parse_micros_precision() {
        assert_eq!("0.000001".parse::<Money>(), Ok(Money::from_micros(1)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            "12x.00".parse::<Money>(),
            Err(ParseMoneyError::Malformed { .. })
        ));
        assert!(matches!(
            "".parse::<Money>(),
            Err(ParseMoneyError::Malformed { .. })
        ));
        assert!(matches!(
            ".50".parse::<Money>(),
            Err(ParseMoneyError::Malformed { .. })
        ));
    }

    #[test]
    fn parse_rejects_seven_decimals() {
        assert!(matches!(
            "1.0000001".parse::<Money>(),
            Err(ParseMoneyError::TooManyDecimals { .. })
        ));
    }

    #[test]
    fn display_parse_roundtrip() {
        for micros in [0, 1, -1, 10_000, 123_456_789, -7_000_000_000] {
            let m = Money::from_micros(micros);
            assert_eq!(m.to_string().parse::<Money>(), Ok(m));
        }
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let m = Money::from_cents(12_345);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"123.45\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
