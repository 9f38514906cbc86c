//! Sub-second precision model
//!
//! A precision decides two things: how many microseconds survive when a
//! value is decoded into a fraction of a second, and how many fractional
//! digits appear when a value is rendered as text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::CalendarFields;
use crate::{Decimal, Result, TimestampError};

/// Supported sub-second precisions, serialized by tag (`"1ms"`, `"100ns"`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Precision {
    #[serde(rename = "2s")]
    TwoSeconds,
    #[serde(rename = "1s")]
    Seconds,
    #[serde(rename = "100ms")]
    Deciseconds,
    #[serde(rename = "10ms")]
    Centiseconds,
    #[serde(rename = "1ms")]
    Milliseconds,
    #[serde(rename = "100us")]
    HundredMicroseconds,
    #[serde(rename = "10us")]
    TenMicroseconds,
    #[serde(rename = "1us")]
    Microseconds,
    #[serde(rename = "100ns")]
    HundredNanoseconds,
    #[serde(rename = "1ns")]
    Nanoseconds,
}

impl Precision {
    pub const ALL: [Precision; 10] = [
        Precision::TwoSeconds,
        Precision::Seconds,
        Precision::Deciseconds,
        Precision::Centiseconds,
        Precision::Milliseconds,
        Precision::HundredMicroseconds,
        Precision::TenMicroseconds,
        Precision::Microseconds,
        Precision::HundredNanoseconds,
        Precision::Nanoseconds,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Precision::TwoSeconds => "2s",
            Precision::Seconds => "1s",
            Precision::Deciseconds => "100ms",
            Precision::Centiseconds => "10ms",
            Precision::Milliseconds => "1ms",
            Precision::HundredMicroseconds => "100us",
            Precision::TenMicroseconds => "10us",
            Precision::Microseconds => "1us",
            Precision::HundredNanoseconds => "100ns",
            Precision::Nanoseconds => "1ns",
        }
    }

    /// Resolve a precision by tag
    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.tag() == tag)
            .ok_or_else(|| TimestampError::UnsupportedPrecision(tag.to_string()))
    }

    /// Number of fractional digits rendered after the seconds field
    pub fn fraction_digits(&self) -> u32 {
        match self {
            Precision::TwoSeconds | Precision::Seconds => 0,
            Precision::Deciseconds => 1,
            Precision::Centiseconds => 2,
            Precision::Milliseconds => 3,
            Precision::HundredMicroseconds => 4,
            Precision::TenMicroseconds => 5,
            Precision::Microseconds => 6,
            Precision::HundredNanoseconds => 7,
            Precision::Nanoseconds => 9,
        }
    }

    /// Convert a microsecond count into a fraction of a second in [0, 1)
    ///
    /// Microseconds are truncated to the precision's unit first, so
    /// `Milliseconds` maps 546_875 to 0.546.
    pub fn microseconds_to_fraction(&self, microseconds: i64) -> Result<Decimal> {
        if !(0..1_000_000).contains(&microseconds) {
            return Err(TimestampError::out_of_range(format!(
                "microseconds {} out of range 0-999999",
                microseconds
            )));
        }

        let digits = self.fraction_digits();
        if digits == 0 {
            return Ok(Decimal::zero());
        }
        if digits >= 6 {
            return Decimal::from_ratio(microseconds as i128, 1_000_000);
        }

        let unit = 10i128.pow(6 - digits);
        let truncated = microseconds as i128 / unit;
        Decimal::from_ratio(truncated, 10i128.pow(digits))
    }

    /// Render `YYYY-MM-DD hh:mm:ss[.f...]` at this precision
    ///
    /// Date-only fields render as `YYYY-MM-DD`. The fraction is truncated
    /// to the precision's digit count.
    pub fn format_date_time(&self, fields: &CalendarFields, fraction: &Decimal) -> Result<String> {
        self.render(fields, fraction, ' ')
    }

    /// Render `YYYY-MM-DDThh:mm:ss[.f...]`, followed by `Z` when the value is UTC
    pub fn format_iso8601(
        &self,
        fields: &CalendarFields,
        fraction: &Decimal,
        is_utc: bool,
    ) -> Result<String> {
        let mut text = self.render(fields, fraction, 'T')?;
        if is_utc && fields.has_time() {
            text.push('Z');
        }
        Ok(text)
    }

    fn render(
        &self,
        fields: &CalendarFields,
        fraction: &Decimal,
        separator: char,
    ) -> Result<String> {
        if fraction.is_negative() || *fraction >= Decimal::from_i64(1) {
            return Err(TimestampError::out_of_range(format!(
                "fraction of second {} not in [0, 1)",
                fraction
            )));
        }

        let date = format!("{:04}-{:02}-{:02}", fields.year, fields.month, fields.day);
        let Some(time) = fields.time else {
            return Ok(date);
        };

        let mut text = format!(
            "{}{}{:02}:{:02}:{:02}",
            date, separator, time.hour, time.minute, time.second
        );

        let digits = self.fraction_digits();
        if digits > 0 {
            let scaled = fraction.mul(&Decimal::pow10(digits)).trunc();
            let value = scaled.to_i128().unwrap_or(0);
            text.push_str(&format!(".{:0width$}", value, width = digits as usize));
        }
        Ok(text)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Precision {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}
