//! Native values held by a timestamp
//!
//! A variant stores either a scalar (tick count, float, packed word), a set
//! of calendar-like sub-fields, or an opaque label.

use serde::{Deserialize, Serialize};
use tickstamp_core::{Result, TimestampError};

/// `(year, month, weekday, day, hours, minutes, seconds, milliseconds)`
pub type SystemtimeTuple = (i64, u32, u32, u32, u32, u32, u32, u32);

/// `(year, month, day, hours, minutes, seconds, deciseconds, direction,
/// hours_from_utc, minutes_from_utc)`
pub type Rfc2579Tuple = (i64, u32, u32, u32, u32, u32, u32, char, u32, u32);

/// Raw native value of a timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NativeValue {
    Ticks(i128),
    Float(f64),
    Packed(u32),
    Fields(NativeFields),
    Label(String),
}

impl NativeValue {
    pub fn kind(&self) -> &'static str {
        match self {
            NativeValue::Ticks(_) => "ticks",
            NativeValue::Float(_) => "float",
            NativeValue::Packed(_) => "packed",
            NativeValue::Fields(_) => "fields",
            NativeValue::Label(_) => "label",
        }
    }
}

/// Calendar sub-fields of a struct-based variant
///
/// `subsecond` counts in the layout's own unit (milliseconds, deciseconds,
/// microseconds). `weekday` is used by Systemtime only; `utc_offset_minutes`
/// by Rfc2579 only (positive zones are ahead of UTC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeFields {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    /// `(hours, minutes, seconds)`; absent for a date-only value
    pub time: Option<(u32, u32, u32)>,
    #[serde(default)]
    pub subsecond: u32,
    #[serde(default)]
    pub weekday: u32,
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl NativeFields {
    pub fn date(year: i64, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            ..Self::default()
        }
    }

    pub fn with_time(mut self, hours: u32, minutes: u32, seconds: u32) -> Self {
        self.time = Some((hours, minutes, seconds));
        self
    }

    pub fn with_subsecond(mut self, subsecond: u32) -> Self {
        self.subsecond = subsecond;
        self
    }

    pub fn with_weekday(mut self, weekday: u32) -> Self {
        self.weekday = weekday;
        self
    }

    pub fn with_utc_offset(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    // ========== Tuple forms ==========

    pub fn from_systemtime_tuple(t: SystemtimeTuple) -> Self {
        let (year, month, weekday, day, hours, minutes, seconds, milliseconds) = t;
        Self::date(year, month, day)
            .with_time(hours, minutes, seconds)
            .with_subsecond(milliseconds)
            .with_weekday(weekday)
    }

    pub fn to_systemtime_tuple(&self) -> SystemtimeTuple {
        let (hours, minutes, seconds) = self.time.unwrap_or_default();
        (self.year, self.month, self.weekday, self.day, hours, minutes, seconds, self.subsecond)
    }

    pub fn from_rfc2579_tuple(t: Rfc2579Tuple) -> Result<Self> {
        let (
            year,
            month,
            day,
            hours,
            minutes,
            seconds,
            deciseconds,
            direction,
            zone_hours,
            zone_minutes,
        ) = t;
        let sign = match direction {
            '+' => 1,
            '-' => -1,
            other => {
                return Err(TimestampError::out_of_range(format!(
                    "direction from UTC {:?} is not '+' or '-'",
                    other
                )))
            }
        };
        if zone_hours > 13 {
            return Err(TimestampError::out_of_range(format!(
                "hours from UTC {} out of range 0-13",
                zone_hours
            )));
        }
        if zone_minutes > 59 {
            return Err(TimestampError::out_of_range(format!(
                "minutes from UTC {} out of range 0-59",
                zone_minutes
            )));
        }
        Ok(Self::date(year, month, day)
            .with_time(hours, minutes, seconds)
            .with_subsecond(deciseconds)
            .with_utc_offset(sign * (zone_hours * 60 + zone_minutes) as i32))
    }

    pub fn to_rfc2579_tuple(&self) -> Rfc2579Tuple {
        let (hours, minutes, seconds) = self.time.unwrap_or_default();
        let direction = if self.utc_offset_minutes < 0 { '-' } else { '+' };
        let zone = self.utc_offset_minutes.unsigned_abs();
        (
            self.year,
            self.month,
            self.day,
            hours,
            minutes,
            seconds,
            self.subsecond,
            direction,
            zone / 60,
            zone % 60,
        )
    }

    /// `(year, month, day, hours, minutes, seconds[, subsecond])`
    pub fn from_time_elements_tuple(values: &[i64], with_subsecond: bool) -> Result<Self> {
        let expected = if with_subsecond { 7 } else { 6 };
        if values.len() != expected {
            return Err(TimestampError::unsupported_value(format!(
                "time elements tuple has {} values, expected {}",
                values.len(),
                expected
            )));
        }

        let field = |index: usize, name: &str| -> Result<u32> {
            u32::try_from(values[index]).map_err(|_| {
                let value = values[index];
                TimestampError::out_of_range(format!("{} value {} out of range", name, value))
            })
        };

        let mut fields = Self::date(values[0], field(1, "month")?, field(2, "day")?)
            .with_time(field(3, "hours")?, field(4, "minutes")?, field(5, "seconds")?);
        if with_subsecond {
            fields = fields.with_subsecond(field(6, "fraction of second")?);
        }
        Ok(fields)
    }

    pub fn to_time_elements_tuple(&self, with_subsecond: bool) -> Vec<i64> {
        let mut values = vec![self.year, self.month as i64, self.day as i64];
        if let Some((hours, minutes, seconds)) = self.time {
            values.extend([hours as i64, minutes as i64, seconds as i64]);
            if with_subsecond {
                values.push(self.subsecond as i64);
            }
        }
        values
    }
}

// ========== FAT date and time ==========

/// Unpack a FAT date/time word: date in the low 16 bits, time in the high 16
pub fn unpack_fat(raw: u32) -> NativeFields {
    let date = raw & 0xffff;
    let time = raw >> 16;
    NativeFields::date(1980 + ((date >> 9) & 0x7f) as i64, (date >> 5) & 0x0f, date & 0x1f)
        .with_time((time >> 11) & 0x1f, (time >> 5) & 0x3f, (time & 0x1f) * 2)
}

/// Pack fields into a FAT date/time word; odd seconds are truncated
///
/// The year must already be within 1980-2107.
pub fn pack_fat(fields: &NativeFields) -> u32 {
    let (hours, minutes, seconds) = fields.time.unwrap_or_default();
    let year = (fields.year - 1980).clamp(0, 0x7f) as u32;
    let date = (year << 9) | ((fields.month & 0x0f) << 5) | (fields.day & 0x1f);
    let time = ((hours & 0x1f) << 11) | ((minutes & 0x3f) << 5) | ((seconds / 2) & 0x1f);
    date | (time << 16)
}

// ========== Semantic labels ==========

/// Meaning of a semantic label, in timeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SemanticKind {
    Invalid,
    NotSet,
    Other,
    Never,
}

impl SemanticKind {
    pub fn of(label: &str) -> Self {
        match label {
            "Invalid" => SemanticKind::Invalid,
            "Not set" => SemanticKind::NotSet,
            "Never" => SemanticKind::Never,
            _ => SemanticKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_fat() {
        let fields = unpack_fat(0xa8d0_3d0c);
        assert_eq!((fields.year, fields.month, fields.day), (2010, 8, 12));
        assert_eq!(fields.time, Some((21, 6, 32)));
    }

    #[test]
    fn test_pack_fat_truncates_odd_seconds() {
        let fields = NativeFields::date(2010, 8, 12).with_time(21, 6, 33);
        assert_eq!(pack_fat(&fields), 0xa8d0_3d0c);
    }

    #[test]
    fn test_systemtime_tuple() {
        let fields = NativeFields::from_systemtime_tuple((2010, 8, 4, 12, 21, 6, 31, 546));
        assert_eq!(fields.weekday, 4);
        assert_eq!(fields.subsecond, 546);
        assert_eq!(fields.to_systemtime_tuple(), (2010, 8, 4, 12, 21, 6, 31, 546));
    }

    #[test]
    fn test_rfc2579_tuple_zone() {
        let fields =
            NativeFields::from_rfc2579_tuple((2010, 8, 12, 20, 6, 31, 6, '+', 1, 30)).unwrap();
        assert_eq!(fields.utc_offset_minutes, 90);
        assert_eq!(fields.to_rfc2579_tuple(), (2010, 8, 12, 20, 6, 31, 6, '+', 1, 30));

        let fields =
            NativeFields::from_rfc2579_tuple((2010, 8, 12, 20, 6, 31, 6, '-', 2, 0)).unwrap();
        assert_eq!(fields.utc_offset_minutes, -120);
    }

    #[test]
    fn test_rfc2579_tuple_invalid_zone() {
        for t in [
            (2010, 8, 12, 20, 6, 31, 6, 'x', 0, 0),
            (2010, 8, 12, 20, 6, 31, 6, '+', 14, 0),
            (2010, 8, 12, 20, 6, 31, 6, '+', 0, 60),
        ] {
            assert!(matches!(
                NativeFields::from_rfc2579_tuple(t),
                Err(TimestampError::OutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_time_elements_tuple() {
        let fields =
            NativeFields::from_time_elements_tuple(&[2010, 8, 12, 21, 6, 31, 546], true).unwrap();
        assert_eq!(fields.subsecond, 546);
        assert_eq!(fields.to_time_elements_tuple(true), vec![2010, 8, 12, 21, 6, 31, 546]);

        assert!(matches!(
            NativeFields::from_time_elements_tuple(&[2010, 8, 12, 21, 6, 31], true),
            Err(TimestampError::UnsupportedValue(_))
        ));
        assert!(matches!(
            NativeFields::from_time_elements_tuple(&[2010, -8, 12, 21, 6, 31], false),
            Err(TimestampError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_semantic_kind_order() {
        assert!(SemanticKind::Invalid < SemanticKind::NotSet);
        assert!(SemanticKind::NotSet < SemanticKind::Other);
        assert!(SemanticKind::Other < SemanticKind::Never);
        assert_eq!(SemanticKind::of("Never"), SemanticKind::Never);
        assert_eq!(SemanticKind::of("never"), SemanticKind::Other);
    }
}
