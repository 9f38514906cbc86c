//! Calendar engine for tickstamp
//!
//! Pure functions over calendar fields: leap years, month lengths, the
//! two-way conversion between calendar fields and seconds since
//! 1970-01-01T00:00:00Z, and date/time string parsing.
//!
//! Design principles:
//! - Gregorian proleptic calendar, UTC
//! - Fixed UTC offsets only (no time zone database, no leap seconds)
//! - Never panics - all operations return Results or Options

use serde::{Deserialize, Serialize};

use crate::{Result, TimestampError};

// ============================================================================
// Constants
// ============================================================================

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
pub const MICROSECONDS_PER_SECOND: i64 = 1_000_000;

/// Days in each month (non-leap year)
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days from 0000-03-01 to 1970-01-01
const UNIX_EPOCH_DAYS: i64 = 719_468;

// ============================================================================
// Calendar fields
// ============================================================================

/// Time-of-day component of a [`CalendarFields`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Present only when the source carried a fraction of a second
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub microsecond: Option<u32>,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            microsecond: None,
        }
    }

    pub fn with_microsecond(mut self, microsecond: u32) -> Self {
        self.microsecond = Some(microsecond);
        self
    }
}

/// Decomposed date and optional time of day
///
/// `time` is `None` when only a date was given. Callers that distinguish
/// "no time" from midnight must check it rather than defaulting to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarFields {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time: Option<TimeOfDay>,
}

impl CalendarFields {
    /// Date-only fields
    pub fn date(year: i64, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            time: None,
        }
    }

    pub fn with_time(mut self, time: TimeOfDay) -> Self {
        self.time = Some(time);
        self
    }

    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }

    pub fn microsecond(&self) -> Option<u32> {
        self.time.and_then(|t| t.microsecond)
    }

    /// Seconds since 1970-01-01T00:00:00Z, see [`fields_to_seconds`]
    pub fn to_seconds(&self) -> Option<i64> {
        fields_to_seconds(
            self.year,
            self.month,
            self.day,
            self.time.map(|t| t.hour),
            self.time.map(|t| t.minute),
            self.time.map(|t| t.second),
        )
    }
}

/// Result of [`parse_time`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTime {
    pub time: TimeOfDay,
    /// Minutes to add to reach UTC. Negated relative to the written sign:
    /// `+01:00` yields `-60`.
    pub utc_offset_minutes: Option<i32>,
}

// ============================================================================
// Calendar Utilities (Gregorian proleptic)
// ============================================================================

/// Check if year is a leap year
pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_year(year: i64) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Get days in a month
pub fn days_in_month(year: i64, month: u32) -> Result<u32> {
    if !(1..=12).contains(&month) {
        return Err(TimestampError::out_of_range(format!("month {} out of range 1-12", month)));
    }
    Ok(month_length(year, month))
}

/// Month length for a month already known to be in 1..=12
fn month_length(year: i64, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        m => DAYS_IN_MONTH[(m - 1) as usize],
    }
}

/// One-based day of the year
pub fn day_of_year(year: i64, month: u32, day: u32) -> Result<u32> {
    let max_day = days_in_month(year, month)?;
    if day < 1 || day > max_day {
        return Err(TimestampError::out_of_range(format!(
            "day {} invalid for {}/{}",
            day, month, year
        )));
    }
    Ok((1..month).map(|m| month_length(year, m)).sum::<u32>() + day)
}

/// Convert civil date to days since Unix epoch
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
fn days_from_civil(year: i64, month: u32, day: u32) -> i128 {
    let y = if month <= 2 { year - 1 } else { year } as i128;
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // [0, 399]
    let m = month as i128;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i128 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146097 + doe - UNIX_EPOCH_DAYS as i128
}

/// Convert days since Unix epoch to civil date
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
pub fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days as i128 + UNIX_EPOCH_DAYS as i128;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let year = if m <= 2 { y + 1 } else { y };
    (year as i64, m as u32, d as u32)
}

/// Seconds from 1970-01-01T00:00:00Z to the given UTC instant
///
/// Missing time components count as zero. Returns `None` when year, month
/// or day is zero (no date present) or the date does not exist.
pub fn fields_to_seconds(
    year: i64,
    month: u32,
    day: u32,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
) -> Option<i64> {
    if year == 0 || month == 0 || day == 0 {
        return None;
    }
    if month > 12 || day > month_length(year, month) {
        return None;
    }

    let days = days_from_civil(year, month, day);
    let seconds = days * SECONDS_PER_DAY as i128
        + hour.unwrap_or(0) as i128 * SECONDS_PER_HOUR as i128
        + minute.unwrap_or(0) as i128 * SECONDS_PER_MINUTE as i128
        + second.unwrap_or(0) as i128;
    i64::try_from(seconds).ok()
}

/// Day of the week, 0 = Sunday
pub fn day_of_week(year: i64, month: u32, day: u32) -> Option<u32> {
    let seconds = fields_to_seconds(year, month, day, None, None, None)?;
    // 1970-01-01 was a Thursday
    Some((seconds.div_euclid(SECONDS_PER_DAY) + 4).rem_euclid(7) as u32)
}

/// Inverse of [`fields_to_seconds`]
pub fn seconds_to_fields(seconds: i64) -> CalendarFields {
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    let remainder = seconds.rem_euclid(SECONDS_PER_DAY);
    let (year, month, day) = civil_from_days(days);

    CalendarFields::date(year, month, day).with_time(TimeOfDay::new(
        (remainder / SECONDS_PER_HOUR) as u32,
        ((remainder % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u32,
        (remainder % SECONDS_PER_MINUTE) as u32,
    ))
}

/// Roll a UTC offset (in minutes to add) into the fields
///
/// Minutes carry into hours, hours into days, days across month and year
/// boundaries. Date-only fields are returned unchanged.
pub fn apply_utc_offset(fields: CalendarFields, offset_minutes: i32) -> CalendarFields {
    let Some(time) = fields.time else {
        return fields;
    };

    let total_minutes = time.minute as i64 + offset_minutes as i64;
    let minute = total_minutes.rem_euclid(60);
    let mut hour = time.hour as i64 + total_minutes.div_euclid(60);
    let mut day = fields.day as i64;

    while hour < 0 {
        hour += 24;
        day -= 1;
    }
    while hour >= 24 {
        hour -= 24;
        day += 1;
    }

    let (mut year, mut month) = (fields.year, fields.month);
    while day < 1 {
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
        day += month_length(year, month) as i64;
    }
    while day > month_length(year, month) as i64 {
        day -= month_length(year, month) as i64;
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }

    CalendarFields {
        year,
        month,
        day: day as u32,
        time: Some(TimeOfDay {
            hour: hour as u32,
            minute: minute as u32,
            second: time.second,
            microsecond: time.microsecond,
        }),
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeSyntax {
    /// `hh:mm:ss[.fff|.ffffff][±hh:mm]`
    Plain,
    /// As plain, plus `,` fraction separator and `Z` suffix
    Iso8601,
}

/// Parse a fixed-width run of ASCII digits
fn parse_digits(bytes: &[u8], field: &str) -> Result<u32> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(TimestampError::invalid_format(format!("invalid {} value", field)));
    }
    bytes
        .iter()
        .try_fold(0u32, |acc, b| acc.checked_mul(10)?.checked_add(u32::from(b - b'0')))
        .ok_or_else(|| TimestampError::invalid_format(format!("{} value is too long", field)))
}

/// Parse `YYYY-MM-DD` from the first 10 characters
pub fn parse_date(s: &str) -> Result<CalendarFields> {
    let bytes = s.as_bytes();
    if bytes.len() < 10 {
        return Err(TimestampError::invalid_format("date string is too short"));
    }
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(TimestampError::invalid_format("expected YYYY-MM-DD"));
    }

    let year = parse_digits(&bytes[0..4], "year")? as i64;
    let month = parse_digits(&bytes[5..7], "month")?;
    let day = parse_digits(&bytes[8..10], "day")?;

    if !(1..=12).contains(&month) {
        return Err(TimestampError::invalid_format(format!("month {} out of bounds", month)));
    }
    if day < 1 || day > month_length(year, month) {
        return Err(TimestampError::invalid_format(format!(
            "day {} out of bounds for {:04}-{:02}",
            day, year, month
        )));
    }

    Ok(CalendarFields::date(year, month, day))
}

/// Parse `±hh:mm`, returning the minutes to add to reach UTC
fn parse_utc_offset(bytes: &[u8]) -> Result<i32> {
    if bytes.len() != 6 || bytes[3] != b':' {
        return Err(TimestampError::invalid_format("expected time zone offset as +hh:mm or -hh:mm"));
    }
    // Normalizing subtracts the written offset, so the sign flips.
    let sign = match bytes[0] {
        b'+' => -1,
        b'-' => 1,
        _ => return Err(TimestampError::invalid_format("invalid time zone offset sign")),
    };
    let hours = parse_digits(&bytes[1..3], "time zone offset hours")?;
    let minutes = parse_digits(&bytes[4..6], "time zone offset minutes")?;
    if hours > 23 {
        return Err(TimestampError::invalid_format(format!(
            "time zone offset hours {} out of bounds",
            hours
        )));
    }
    if minutes > 59 {
        return Err(TimestampError::invalid_format(format!(
            "time zone offset minutes {} out of bounds",
            minutes
        )));
    }
    Ok(sign * (hours * 60 + minutes) as i32)
}

fn parse_time_with(s: &str, syntax: TimeSyntax) -> Result<ParsedTime> {
    let bytes = s.as_bytes();
    if bytes.len() < 8 {
        return Err(TimestampError::invalid_format("time string is too short"));
    }
    if bytes[2] != b':' || bytes[5] != b':' {
        return Err(TimestampError::invalid_format("expected hh:mm:ss"));
    }

    let hour = parse_digits(&bytes[0..2], "hours")?;
    let minute = parse_digits(&bytes[3..5], "minutes")?;
    let second = parse_digits(&bytes[6..8], "seconds")?;
    if hour > 23 {
        return Err(TimestampError::invalid_format(format!("hours {} out of bounds", hour)));
    }
    if minute > 59 {
        return Err(TimestampError::invalid_format(format!("minutes {} out of bounds", minute)));
    }
    if second > 59 {
        return Err(TimestampError::invalid_format(format!("seconds {} out of bounds", second)));
    }

    let mut time = TimeOfDay::new(hour, minute, second);
    let mut index = 8;

    let is_fraction_separator = |b: u8| b == b'.' || (syntax == TimeSyntax::Iso8601 && b == b',');
    if index < bytes.len() && is_fraction_separator(bytes[index]) {
        index += 1;
        let digits = bytes[index..].iter().take_while(|b| b.is_ascii_digit()).count();
        let scale = match digits {
            3 => 1000,
            6 => 1,
            _ => {
                return Err(TimestampError::invalid_format(format!(
                    "fraction of second has {} digits, expected 3 or 6",
                    digits
                )))
            }
        };
        let microsecond =
            parse_digits(&bytes[index..index + digits], "fraction of second")? * scale;
        time = time.with_microsecond(microsecond);
        index += digits;
    }

    let utc_offset_minutes = if index >= bytes.len() {
        None
    } else if syntax == TimeSyntax::Iso8601 && &bytes[index..] == b"Z" {
        Some(0)
    } else {
        Some(parse_utc_offset(&bytes[index..])?)
    };

    Ok(ParsedTime {
        time,
        utc_offset_minutes,
    })
}

/// Parse `hh:mm:ss[.fff|.ffffff][±hh:mm]`
pub fn parse_time(s: &str) -> Result<ParsedTime> {
    parse_time_with(s, TimeSyntax::Plain)
}

fn parse_with_separator(s: &str, separator: u8, syntax: TimeSyntax) -> Result<CalendarFields> {
    let fields = parse_date(s)?;
    let bytes = s.as_bytes();
    if bytes.len() == 10 {
        return Ok(fields);
    }
    if bytes[10] != separator {
        return Err(TimestampError::invalid_format(format!(
            "expected '{}' between date and time",
            separator as char
        )));
    }

    // The first 11 bytes are ASCII, so byte 11 is a char boundary.
    let parsed = parse_time_with(&s[11..], syntax)?;
    let fields = fields.with_time(parsed.time);
    Ok(match parsed.utc_offset_minutes {
        Some(offset) => apply_utc_offset(fields, offset),
        None => fields,
    })
}

/// Parse `YYYY-MM-DD[ hh:mm:ss[.fff|.ffffff][±hh:mm]]`
///
/// A UTC offset is rolled into the returned fields, which are then UTC.
/// A date-only string yields fields with no time of day.
pub fn parse_date_time(s: &str) -> Result<CalendarFields> {
    parse_with_separator(s, b' ', TimeSyntax::Plain)
}

/// Parse `YYYY-MM-DD[Thh:mm:ss[(.|,)fff|ffffff][Z|±hh:mm]]`
pub fn parse_iso8601(s: &str) -> Result<CalendarFields> {
    parse_with_separator(s, b'T', TimeSyntax::Iso8601)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn time_of(fields: &CalendarFields) -> TimeOfDay {
        fields.time.unwrap()
    }

    #[test]
    fn test_leap_year() {
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(1996));
        assert!(!is_leap_year(1999));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2023, 1).unwrap(), 31);
        assert_eq!(days_in_month(2023, 4).unwrap(), 30);
        assert!(matches!(days_in_month(2023, 13), Err(TimestampError::OutOfRange(_))));
        assert!(matches!(days_in_month(2023, 0), Err(TimestampError::OutOfRange(_))));
    }

    #[test]
    fn test_days_in_year() {
        assert_eq!(days_in_year(2000), 366);
        assert_eq!(days_in_year(1900), 365);
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(2025, 1, 1).unwrap(), 1);
        assert_eq!(day_of_year(2025, 12, 31).unwrap(), 365);
        assert_eq!(day_of_year(2024, 12, 31).unwrap(), 366);
        assert!(matches!(day_of_year(2023, 2, 29), Err(TimestampError::OutOfRange(_))));
        assert!(matches!(day_of_year(2023, 13, 1), Err(TimestampError::OutOfRange(_))));
    }

    #[test]
    fn test_fields_to_seconds() {
        assert_eq!(fields_to_seconds(1970, 1, 1, None, None, None), Some(0));
        assert_eq!(
            fields_to_seconds(2010, 8, 12, Some(21), Some(6), Some(31)),
            Some(1_281_647_191)
        );
        assert_eq!(fields_to_seconds(1601, 1, 1, None, None, None), Some(-11_644_473_600));
        assert_eq!(fields_to_seconds(1, 1, 1, None, None, None), Some(-62_135_596_800));
        assert_eq!(fields_to_seconds(1969, 12, 31, Some(23), Some(59), Some(59)), Some(-1));
    }

    #[test]
    fn test_fields_to_seconds_no_date() {
        assert_eq!(fields_to_seconds(0, 1, 1, None, None, None), None);
        assert_eq!(fields_to_seconds(2010, 0, 1, None, None, None), None);
        assert_eq!(fields_to_seconds(2010, 1, 0, None, None, None), None);
        assert_eq!(fields_to_seconds(2010, 13, 1, None, None, None), None);
        assert_eq!(fields_to_seconds(2011, 2, 29, None, None, None), None);
    }

    #[test]
    fn test_day_of_week() {
        assert_eq!(day_of_week(1970, 1, 1), Some(4));
        assert_eq!(day_of_week(2010, 8, 12), Some(4));
        assert_eq!(day_of_week(1601, 1, 1), Some(1));
        assert_eq!(day_of_week(1969, 12, 28), Some(0));
        assert_eq!(day_of_week(2010, 2, 30), None);
    }

    #[test]
    fn test_seconds_fields_roundtrip() {
        let samples = [
            (1, 1, 1, 0, 0, 0),
            (1582, 10, 15, 12, 0, 1),
            (1899, 12, 30, 23, 59, 59),
            (1969, 12, 31, 23, 59, 59),
            (2000, 2, 29, 6, 30, 0),
            (2010, 8, 12, 21, 6, 31),
            (9999, 12, 31, 23, 59, 59),
            (30827, 12, 31, 23, 59, 59),
        ];
        for (y, m, d, h, mi, s) in samples {
            let seconds = fields_to_seconds(y, m, d, Some(h), Some(mi), Some(s)).unwrap();
            let fields = seconds_to_fields(seconds);
            assert_eq!((fields.year, fields.month, fields.day), (y, m, d));
            assert_eq!(time_of(&fields), TimeOfDay::new(h, mi, s));
        }
    }

    #[test]
    fn test_parse_date() {
        let fields = parse_date("2010-08-12").unwrap();
        assert_eq!((fields.year, fields.month, fields.day), (2010, 8, 12));
        assert!(!fields.has_time());
    }

    #[test]
    fn test_parse_date_invalid() {
        for input in [
            "2010-08-1",
            "2010/08/12",
            "201a-08-12",
            "2010-13-12",
            "2010-02-30",
            "2010-08-00",
            "+010-08-12",
            " 010-08-12",
        ] {
            assert!(
                matches!(parse_date(input), Err(TimestampError::InvalidFormat(_))),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_time() {
        let parsed = parse_time("21:06:31").unwrap();
        assert_eq!(parsed.time, TimeOfDay::new(21, 6, 31));
        assert_eq!(parsed.utc_offset_minutes, None);

        let parsed = parse_time("21:06:31.546").unwrap();
        assert_eq!(parsed.time.microsecond, Some(546_000));

        let parsed = parse_time("21:06:31.546875").unwrap();
        assert_eq!(parsed.time.microsecond, Some(546_875));
    }

    #[test]
    fn test_parse_time_offset_sign_inverted() {
        assert_eq!(parse_time("21:06:31+01:00").unwrap().utc_offset_minutes, Some(-60));
        assert_eq!(parse_time("21:06:31-01:30").unwrap().utc_offset_minutes, Some(90));
        assert_eq!(parse_time("21:06:31.546875+00:30").unwrap().utc_offset_minutes, Some(-30));
    }

    #[test]
    fn test_parse_long_fraction_rejected() {
        for input in [
            "2010-08-12 21:06:31.12345678901",
            "2010-08-12 21:06:31.123456789012345678901234567890",
        ] {
            assert!(
                matches!(parse_date_time(input), Err(TimestampError::InvalidFormat(_))),
                "expected {:?} to be rejected",
                input
            );
        }
        assert!(matches!(
            parse_iso8601("2010-08-12T21:06:31,12345678901Z"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_digits_overflow() {
        assert!(matches!(
            parse_digits(b"99999999999", "value"),
            Err(TimestampError::InvalidFormat(_))
        ));
        assert_eq!(parse_digits(b"4294967295", "value").unwrap(), u32::MAX);
    }

    #[test]
    fn test_parse_time_invalid() {
        for input in [
            "21:06",
            "21-06-31",
            "24:00:00",
            "23:60:00",
            "23:59:60",
            "21:06:31.5",
            "21:06:31.5468",
            "21:06:31.5468751",
            "21:06:31,546",
            "21:06:31*01:00",
            "21:06:31+0100",
            "21:06:31+24:00",
            "21:06:31+01:60",
            "21:06:31Z",
        ] {
            assert!(
                matches!(parse_time(input), Err(TimestampError::InvalidFormat(_))),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_date_time() {
        let fields = parse_date_time("2010-08-12 21:06:31.546875").unwrap();
        assert_eq!((fields.year, fields.month, fields.day), (2010, 8, 12));
        assert_eq!(time_of(&fields), TimeOfDay::new(21, 6, 31).with_microsecond(546_875));
    }

    #[test]
    fn test_parse_date_time_date_only() {
        let fields = parse_date_time("2010-08-12").unwrap();
        assert_eq!(fields.time, None);
    }

    #[test]
    fn test_parse_date_time_requires_space() {
        assert!(matches!(
            parse_date_time("2010-08-12T21:06:31"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_date_time_applies_offset() {
        let fields = parse_date_time("2010-08-12 21:06:31.546875-01:00").unwrap();
        assert_eq!((fields.year, fields.month, fields.day), (2010, 8, 12));
        assert_eq!(time_of(&fields), TimeOfDay::new(22, 6, 31).with_microsecond(546_875));

        let fields = parse_date_time("2010-08-12 21:06:31.546875+01:00").unwrap();
        assert_eq!(time_of(&fields), TimeOfDay::new(20, 6, 31).with_microsecond(546_875));
    }

    #[test]
    fn test_offset_rollover_backward_across_year() {
        let fields = parse_date_time("2010-01-01 00:15:00.123456+00:30").unwrap();
        assert_eq!((fields.year, fields.month, fields.day), (2009, 12, 31));
        assert_eq!(time_of(&fields), TimeOfDay::new(23, 45, 0).with_microsecond(123_456));
    }

    #[test]
    fn test_offset_rollover_forward_across_year() {
        let fields = parse_date_time("2009-12-31 23:45:00.123456-01:30").unwrap();
        assert_eq!((fields.year, fields.month, fields.day), (2010, 1, 1));
        assert_eq!(time_of(&fields), TimeOfDay::new(1, 15, 0).with_microsecond(123_456));
    }

    #[test]
    fn test_offset_rollover_leap_day() {
        let fields = parse_date_time("2000-03-01 01:00:00+02:00").unwrap();
        assert_eq!((fields.year, fields.month, fields.day), (2000, 2, 29));
        assert_eq!(time_of(&fields), TimeOfDay::new(23, 0, 0));

        let fields = parse_date_time("1900-02-28 23:00:00-02:00").unwrap();
        assert_eq!((fields.year, fields.month, fields.day), (1900, 3, 1));
        assert_eq!(time_of(&fields), TimeOfDay::new(1, 0, 0));
    }

    #[test]
    fn test_apply_utc_offset_date_only() {
        let fields = CalendarFields::date(2010, 1, 1);
        assert_eq!(apply_utc_offset(fields, -30), fields);
    }

    #[test]
    fn test_parse_iso8601() {
        let fields = parse_iso8601("2010-08-12T21:06:31,546875Z").unwrap();
        assert_eq!(time_of(&fields), TimeOfDay::new(21, 6, 31).with_microsecond(546_875));

        let fields = parse_iso8601("2010-08-12T21:06:31.546+01:00").unwrap();
        assert_eq!(time_of(&fields), TimeOfDay::new(20, 6, 31).with_microsecond(546_000));

        let fields = parse_iso8601("2010-08-12").unwrap();
        assert!(!fields.has_time());

        assert!(parse_iso8601("2010-08-12 21:06:31").is_err());
        assert!(parse_iso8601("2010-08-12T21:06:31ZZ").is_err());
    }

    #[test]
    fn test_calendar_fields_to_seconds() {
        let fields = CalendarFields::date(2010, 8, 12);
        assert_eq!(fields.to_seconds(), Some(1_281_571_200));
        let fields = fields.with_time(TimeOfDay::new(21, 6, 31));
        assert_eq!(fields.to_seconds(), Some(1_281_647_191));
    }
}
