//! Normalized timeline value
//!
//! Signed seconds since 1970-01-01T00:00:00Z held as an exact decimal.
//! Every timestamp variant converts to and from this one representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::{seconds_to_fields, CalendarFields};
use crate::{Decimal, Result};

/// 100 ns intervals per second
pub const HUNDRED_NANOSECONDS_PER_SECOND: i128 = 10_000_000;

/// Seconds since 1970-01-01T00:00:00Z with exact fractional part
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedTimestamp(Decimal);

impl NormalizedTimestamp {
    /// The epoch itself
    pub fn zero() -> Self {
        Self(Decimal::zero())
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Self(Decimal::from_i64(seconds))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    /// Whole seconds plus a non-negative fraction
    pub fn from_parts(seconds: i64, fraction: &Decimal) -> Self {
        Self(Decimal::from_i64(seconds).add(fraction))
    }

    /// `raw / ticks_per_second + epoch_offset_seconds`
    pub fn from_ticks(
        raw: i128,
        ticks_per_second: i128,
        epoch_offset_seconds: i64,
    ) -> Result<Self> {
        let seconds = Decimal::from_ratio(raw, ticks_per_second)?;
        Ok(Self(seconds.add(&Decimal::from_i64(epoch_offset_seconds))))
    }

    pub fn as_decimal(&self) -> &Decimal {
        &self.0
    }

    /// Whole seconds, floored toward negative infinity
    pub fn seconds(&self) -> Option<i64> {
        self.0.floor().to_i64()
    }

    /// Fraction of a second in [0, 1)
    pub fn fraction(&self) -> Decimal {
        self.0.fract()
    }

    /// Inverse of [`from_ticks`](Self::from_ticks); sub-tick remainders are floored
    pub fn to_ticks(&self, ticks_per_second: i128, epoch_offset_seconds: i64) -> Option<i128> {
        self.0
            .sub(&Decimal::from_i64(epoch_offset_seconds))
            .mul(&Decimal::from_i128(ticks_per_second))
            .floor()
            .to_i128()
    }

    /// `(seconds, remainder in 100 ns units)`
    pub fn to_timeline_tuple(&self) -> Option<(i64, u32)> {
        let seconds = self.seconds()?;
        let remainder = self
            .fraction()
            .mul(&Decimal::from_i128(HUNDRED_NANOSECONDS_PER_SECOND))
            .trunc()
            .to_i128()?;
        Some((seconds, u32::try_from(remainder).ok()?))
    }

    /// Whole microseconds since the epoch, floored
    pub fn to_microseconds(&self) -> Option<i64> {
        self.0.mul(&Decimal::pow10(6)).floor().to_i64()
    }

    /// Calendar fields (with microseconds) and the exact fraction of a second
    pub fn to_calendar(&self) -> Option<(CalendarFields, Decimal)> {
        let seconds = self.seconds()?;
        let fraction = self.fraction();
        let microsecond = fraction.mul(&Decimal::pow10(6)).trunc().to_i64()? as u32;

        let mut fields = seconds_to_fields(seconds);
        if let Some(time) = fields.time.as_mut() {
            time.microsecond = Some(microsecond);
        }
        Some((fields, fraction))
    }
}

impl fmt::Display for NormalizedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for NormalizedTimestamp {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}
