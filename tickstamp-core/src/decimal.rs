//! Arbitrary precision decimals using dashu
//!
//! Uses dashu-float (DBig) for exact decimal arithmetic. Every tick scale
//! used by the timestamp variants is a power of ten, so rescaling between
//! ticks and seconds never loses digits at the working precision.

use dashu_float::DBig;
use dashu_int::IBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use crate::{Result, TimestampError};

/// Default precision for calculations (decimal digits)
///
/// 39 integer digits cover every 128-bit tick count, leaving room for the
/// 9 fractional digits of a nanosecond remainder.
const DEFAULT_PRECISION: usize = 50;

/// Arbitrary precision decimal number
///
/// Built on dashu-float's DBig. All operations return Results or new
/// values - never panic.
#[derive(Debug, Clone)]
pub struct Decimal {
    inner: DBig,
}

impl Decimal {
    // ========== Construction ==========

    /// Ensure a DBig has adequate precision for calculations
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(DEFAULT_PRECISION).value()
    }

    pub fn zero() -> Self {
        Self::from_i64(0)
    }

    /// Create from i64 with working precision
    pub fn from_i64(n: i64) -> Self {
        Self::from_i128(n as i128)
    }

    /// Create from i128 with working precision
    pub fn from_i128(n: i128) -> Self {
        Self {
            inner: Self::with_work_precision(DBig::from(IBig::from(n))),
        }
    }

    /// Create from string representation such as "123", "-0.5" or "1281647191.546875"
    pub fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let inner: DBig = s
            .parse()
            .map_err(|_| TimestampError::invalid_format(format!("not a decimal number: {}", s)))?;
        Ok(Self {
            inner: Self::with_work_precision(inner),
        })
    }

    /// Create from f64 using its shortest round-trip text form
    pub fn from_f64(f: f64) -> Result<Self> {
        if !f.is_finite() {
            return Err(TimestampError::out_of_range(format!("non-finite value: {}", f)));
        }
        Self::from_str(&format!("{}", f))
    }

    /// Create from ratio (exact for power-of-ten denominators)
    pub fn from_ratio(num: i128, den: i128) -> Result<Self> {
        Self::from_i128(num).checked_div(&Self::from_i128(den))
    }

    /// 10^exp
    pub fn pow10(exp: u32) -> Self {
        Self {
            inner: Self::with_work_precision(DBig::from(IBig::from(10u8).pow(exp as usize))),
        }
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    /// Check if value is an integer
    pub fn is_integer(&self) -> bool {
        self.inner == self.inner.clone().floor()
    }

    // ========== Basic Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        Self {
            inner: &self.inner + &other.inner,
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self {
            inner: &self.inner - &other.inner,
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self {
            inner: &self.inner * &other.inner,
        }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            Err(TimestampError::out_of_range("division by zero"))
        } else {
            Ok(Self {
                inner: &self.inner / &other.inner,
            })
        }
    }

    // ========== Rounding ==========

    /// Largest integer <= x
    pub fn floor(&self) -> Self {
        Self {
            inner: self.inner.clone().floor(),
        }
    }

    /// Integer part, rounding toward zero
    pub fn trunc(&self) -> Self {
        Self {
            inner: self.inner.clone().trunc(),
        }
    }

    /// x - floor(x), always in [0, 1)
    pub fn fract(&self) -> Self {
        self.sub(&self.floor())
    }

    /// Round half away from zero to `places` fractional digits
    pub fn round_to_places(&self, places: u32) -> Self {
        let scale = Self::pow10(places);
        let half = Self {
            inner: Self::with_work_precision(DBig::from_parts(IBig::from(5u8), -1)),
        };
        let scaled = self.mul(&scale);
        let rounded = if scaled.is_negative() {
            Self::zero().sub(&Self::zero().sub(&scaled).add(&half).floor())
        } else {
            scaled.add(&half).floor()
        };
        rounded.checked_div(&scale).unwrap_or(rounded)
    }

    // ========== Conversion ==========

    /// Try to convert to i128 (integers only)
    pub fn to_i128(&self) -> Option<i128> {
        if !self.is_integer() {
            return None;
        }

        // DBig stores as significand * 10^exponent
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let ten = IBig::from(10u8);

        if exponent >= 0 {
            let value = significand * ten.pow(exponent as usize);
            value.try_into().ok()
        } else {
            let divisor = ten.pow(exponent.unsigned_abs());
            if &significand % &divisor != IBig::ZERO {
                return None;
            }
            (significand / divisor).try_into().ok()
        }
    }

    /// Try to convert to i64 (integers only)
    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|n| i64::try_from(n).ok())
    }

    /// Convert to f64 (may lose precision)
    pub fn to_f64(&self) -> Option<f64> {
        self.to_string().parse::<f64>().ok().filter(|f| f.is_finite())
    }
}

// ========== Trait Implementations ==========

impl fmt::Display for Decimal {
    /// Exact decimal rendering without exponent notation
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let text = significand.to_string();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest.to_string()),
            None => (false, text),
        };

        let body = if digits == "0" {
            "0".to_string()
        } else if exponent >= 0 {
            format!("{}{}", digits, "0".repeat(exponent as usize))
        } else {
            let places = exponent.unsigned_abs();
            let padded = if digits.len() <= places {
                format!("{}{}", "0".repeat(places - digits.len() + 1), digits)
            } else {
                digits
            };
            let (int_part, frac_part) = padded.split_at(padded.len() - places);
            let frac_part = frac_part.trim_end_matches('0');
            if frac_part.is_empty() {
                int_part.to_string()
            } else {
                format!("{}.{}", int_part, frac_part)
            }
        };

        if negative && body != "0" {
            write!(f, "-{}", body)
        } else {
            write!(f, "{}", body)
        }
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        // DBig implements PartialOrd, use it and treat None as Equal
        self.inner.partial_cmp(&other.inner).unwrap_or(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_i64() {
        let n = Decimal::from_i64(42);
        assert_eq!(n.to_i64(), Some(42));
    }

    #[test]
    fn test_from_str_decimal() {
        let n = Decimal::from_str("1281647191.546875").unwrap();
        assert!(!n.is_integer());
        assert_eq!(n.to_string(), "1281647191.546875");
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!(Decimal::from_str("12:00").is_err());
    }

    #[test]
    fn test_exact_tick_division() {
        let ticks = Decimal::from_i128(129_261_243_915_468_750);
        let seconds = ticks.checked_div(&Decimal::pow10(7)).unwrap();
        assert_eq!(seconds.to_string(), "12926124391.546875");
    }

    #[test]
    fn test_display_small_and_negative() {
        assert_eq!(Decimal::from_ratio(1, 10_000_000).unwrap().to_string(), "0.0000001");
        assert_eq!(Decimal::from_str("-0.5").unwrap().to_string(), "-0.5");
        assert_eq!(Decimal::from_i64(-3600).to_string(), "-3600");
        assert_eq!(Decimal::zero().to_string(), "0");
        assert_eq!(Decimal::pow10(3).to_string(), "1000");
    }

    #[test]
    fn test_floor_and_trunc() {
        let n = Decimal::from_str("-1.25").unwrap();
        assert_eq!(n.floor().to_i64(), Some(-2));
        assert_eq!(n.trunc().to_i64(), Some(-1));
    }

    #[test]
    fn test_round_to_places() {
        let n = Decimal::from_str("0.5468749999").unwrap();
        assert_eq!(n.round_to_places(6).to_string(), "0.546875");
        let n = Decimal::from_str("-0.0000015").unwrap();
        assert_eq!(n.round_to_places(6).to_string(), "-0.000002");
    }

    #[test]
    fn test_to_i128_large() {
        let n = Decimal::from_i128(u64::MAX as i128);
        assert_eq!(n.to_i128(), Some(u64::MAX as i128));
        assert_eq!(Decimal::from_str("0.5").unwrap().to_i128(), None);
    }

    #[test]
    fn test_from_f64() {
        let n = Decimal::from_f64(40402.5).unwrap();
        assert_eq!(n.to_string(), "40402.5");
        assert!(Decimal::from_f64(f64::NAN).is_err());
        assert_eq!(n.to_f64(), Some(40402.5));
    }

    #[test]
    fn test_ordering() {
        let a = Decimal::from_str("-0.1").unwrap();
        let b = Decimal::zero();
        assert!(a < b);
        assert_eq!(Decimal::from_str("1.50").unwrap(), Decimal::from_str("1.5").unwrap());
    }

    #[test]
    fn test_serde_roundtrip() {
        let n = Decimal::from_str("12.125").unwrap();
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"12.125\"");
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }
}
