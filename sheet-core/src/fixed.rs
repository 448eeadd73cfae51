//! Fixed-point decimal quantities.
//!
//! Point costs, levels, quantities and weights are compared exactly, so
//! they are stored as a signed integer scaled by 10^4 rather than as
//! floats. `0.1 + 0.2 == 0.3` holds here.
//!
//! Arithmetic saturates at [`Fixed::MIN`] and [`Fixed::MAX`] so that
//! evaluating a sheet can never panic, however large its numbers.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Number of decimal places kept.
const DECIMAL_PLACES: u32 = 4;

/// The multiplier for 4 decimal places.
const MULTIPLIER: i64 = 10i64.pow(DECIMAL_PLACES);

/// Errors from parsing a decimal quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedError {
    #[error("empty numeric value")]
    Empty,

    #[error("invalid numeric value: {0:?}")]
    Invalid(String),

    #[error("too many decimal places in {0:?} (at most 4)")]
    TooPrecise(String),

    #[error("numeric value out of range: {0:?}")]
    Overflow(String),
}

/// Fixed-point decimal number with 4 decimal places.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Fixed(i64);

impl Fixed {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One whole unit.
    pub const ONE: Self = Self(MULTIPLIER);

    /// Largest representable value.
    pub const MAX: Self = Self(i64::MAX);

    /// Smallest representable value.
    pub const MIN: Self = Self(i64::MIN);

    /// Creates from a whole number, saturating outside the representable range.
    pub const fn from_int(whole: i64) -> Self {
        Self(whole.saturating_mul(MULTIPLIER))
    }

    /// Creates from raw ten-thousandths.
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// Raw ten-thousandths.
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Whole part, truncated toward zero.
    pub const fn trunc(self) -> i64 {
        self.0 / MULTIPLIER
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Multiplies by another fixed value, e.g. quantity × unit weight.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        let wide = (self.0 as i128) * (rhs.0 as i128) / (MULTIPLIER as i128);
        i64::try_from(wide).ok().map(Self)
    }

    /// Parses decimal text such as `"12"`, `"-0.5"` or `"1.25"`.
    pub fn parse(text: &str) -> Result<Self, FixedError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FixedError::Empty);
        }

        let (negative, digits) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if (whole.is_empty() && frac.is_empty())
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(FixedError::Invalid(text.to_string()));
        }

        let frac = frac.trim_end_matches('0');
        if frac.len() > DECIMAL_PLACES as usize {
            return Err(FixedError::TooPrecise(text.to_string()));
        }

        let overflow = || FixedError::Overflow(text.to_string());
        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut frac_value: i64 = 0;
        for (i, b) in frac.bytes().enumerate() {
            frac_value += i64::from(b - b'0') * 10i64.pow(DECIMAL_PLACES - 1 - i as u32);
        }

        // Widened so that `Fixed::MIN` still parses back from its own text.
        let magnitude =
            i128::from(whole_value) * i128::from(MULTIPLIER) + i128::from(frac_value);
        let value = if negative { -magnitude } else { magnitude };
        i64::try_from(value).map(Self).map_err(|_| overflow())
    }
}

impl From<i64> for Fixed {
    fn from(value: i64) -> Self {
        Self::from_int(value)
    }
}

impl From<usize> for Fixed {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::MAX, Self::from_int)
    }
}

impl FromStr for Fixed {
    type Err = FixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.saturating_neg())
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({self})")
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / MULTIPLIER as u64;
        let frac = magnitude % MULTIPLIER as u64;
        if frac == 0 {
            return write!(f, "{sign}{whole}");
        }
        let frac = format!("{:0width$}", frac, width = DECIMAL_PLACES as usize);
        write!(f, "{sign}{whole}.{}", frac.trim_end_matches('0'))
    }
}

// ============================================================================
// Serde
// ============================================================================

/// Whole values are written as JSON integers. Fractional values are written
/// as their exact decimal text, since a float cannot hold every value.
impl Serialize for Fixed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MULTIPLIER == 0 {
            serializer.serialize_i64(self.trunc())
        } else {
            serializer.collect_str(self)
        }
    }
}

struct FixedVisitor;

impl<'de> Visitor<'de> for FixedVisitor {
    type Value = Fixed;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number with at most four decimal places")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Fixed, E> {
        v.checked_mul(MULTIPLIER)
            .map(Fixed)
            .ok_or_else(|| E::custom(FixedError::Overflow(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Fixed, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(MULTIPLIER))
            .map(Fixed)
            .ok_or_else(|| E::custom(FixedError::Overflow(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Fixed, E> {
        if !v.is_finite() {
            return Err(E::custom(FixedError::Invalid(v.to_string())));
        }
        // Display yields the shortest text that round-trips, so 0.1 stays 0.1.
        Fixed::parse(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Fixed, E> {
        Fixed::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Fixed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FixedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Fixed::parse("1.5").unwrap(), Fixed::from_units(15_000));
        assert_eq!(Fixed::parse("-0.25").unwrap().to_string(), "-0.25");
        assert_eq!(Fixed::parse("12").unwrap().to_string(), "12");
        assert_eq!(Fixed::parse(".5").unwrap().to_string(), "0.5");
        assert_eq!(Fixed::parse("2.5000").unwrap().to_string(), "2.5");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Fixed::parse(""), Err(FixedError::Empty));
        assert!(matches!(Fixed::parse("abc"), Err(FixedError::Invalid(_))));
        assert!(matches!(Fixed::parse("1.2.3"), Err(FixedError::Invalid(_))));
        assert!(matches!(Fixed::parse("."), Err(FixedError::Invalid(_))));
        assert!(matches!(
            Fixed::parse("0.00001"),
            Err(FixedError::TooPrecise(_))
        ));
        assert!(matches!(
            Fixed::parse("99999999999999999999"),
            Err(FixedError::Overflow(_))
        ));
    }

    #[test]
    fn test_no_rounding_drift() {
        let tenth = Fixed::parse("0.1").unwrap();
        let sum = tenth + tenth + tenth;
        assert_eq!(sum, Fixed::parse("0.3").unwrap());
        let total: Fixed = std::iter::repeat(tenth).take(10).sum();
        assert_eq!(total, Fixed::ONE);
    }

    #[test]
    fn test_checked_mul() {
        let qty = Fixed::from_int(3);
        let weight = Fixed::parse("1.5").unwrap();
        assert_eq!(qty.checked_mul(weight), Some(Fixed::parse("4.5").unwrap()));
        assert_eq!(Fixed::MAX.checked_mul(Fixed::from_int(2)), None);
        assert_eq!(
            Fixed::MAX.checked_mul(Fixed::ONE),
            Some(Fixed::MAX),
            "multiplying by one never overflows"
        );
    }

    #[test]
    fn test_arithmetic_saturates() {
        let near_max = Fixed::from_units(i64::MAX / 2 + 1);
        assert_eq!(near_max + near_max, Fixed::MAX);
        assert_eq!(-near_max - near_max - near_max, Fixed::MIN);
        assert_eq!(-Fixed::MIN, Fixed::MAX);

        let mut total = Fixed::MAX;
        total += Fixed::ONE;
        assert_eq!(total, Fixed::MAX);
        total -= Fixed::MAX;
        assert_eq!(total, Fixed::ZERO);

        let sum: Fixed = [near_max, near_max, Fixed::ONE].into_iter().sum();
        assert_eq!(sum, Fixed::MAX);
    }

    #[test]
    fn test_from_int_saturates() {
        assert_eq!(Fixed::from_int(99_999_999_999_999_999), Fixed::MAX);
        assert_eq!(Fixed::from_int(i64::MIN), Fixed::MIN);
        assert_eq!(Fixed::from_int(922_337_203_685_477).trunc(), 922_337_203_685_477);
    }

    #[test]
    fn test_extremes_parse_from_their_own_text() {
        for value in [Fixed::MAX, Fixed::MIN] {
            assert_eq!(Fixed::parse(&value.to_string()), Ok(value));
        }
        assert_eq!(Fixed::MIN.to_string(), "-922337203685477.5808");
        assert!(matches!(
            Fixed::parse("922337203685477.5808"),
            Err(FixedError::Overflow(_))
        ));
    }

    #[test]
    fn test_json_forms() {
        let from_float: Fixed = serde_json::from_str("0.1").unwrap();
        assert_eq!(from_float, Fixed::from_units(1_000));
        let from_int: Fixed = serde_json::from_str("7").unwrap();
        assert_eq!(from_int, Fixed::from_int(7));
        let from_text: Fixed = serde_json::from_str("\"1.25\"").unwrap();
        assert_eq!(from_text, Fixed::from_units(12_500));

        assert_eq!(serde_json::to_string(&Fixed::from_int(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&Fixed::parse("1.5").unwrap()).unwrap(),
            "\"1.5\""
        );
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        for text in [
            "900719925474.0993",
            "922337203685477.5807",
            "-922337203685477.5808",
            "0.0001",
        ] {
            let value = Fixed::parse(text).unwrap();
            let json = serde_json::to_string(&value).unwrap();
            let back: Fixed = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value, "{text} came back as {back} via {json}");
        }
    }

    #[test]
    fn test_json_rejects_corrupt_numbers() {
        assert!(serde_json::from_str::<Fixed>("\"ten\"").is_err());
        assert!(serde_json::from_str::<Fixed>("true").is_err());
        assert!(serde_json::from_str::<Fixed>("0.123456").is_err());
    }
}
