//! Generic codec
//!
//! One set of algorithms serves every variant; the descriptor supplies the
//! epoch offset, the tick scale, the raw domain and the rounding rule.
//!
//! - `decode`: native value -> normalized timeline (range errors are `OutOfRange`)
//! - `encode`: calendar fields -> native value (unrepresentable dates are `UnsupportedValue`)

use tickstamp_core::{
    calendar, CalendarFields, Decimal, NormalizedTimestamp, Result, TimestampError,
};
use tracing::debug;

use crate::descriptor::{FieldLayout, RawDomain, Rounding, Scale, VariantDescriptor};
use crate::native::{pack_fat, unpack_fat, NativeFields, NativeValue};

const SECONDS_PER_DAY: i64 = 86_400;
const MICROSECONDS_PER_SECOND: i128 = 1_000_000;

fn shape_error(descriptor: &VariantDescriptor, native: &NativeValue) -> TimestampError {
    TimestampError::unsupported_value(format!(
        "{} cannot hold a {} value",
        descriptor.name,
        native.kind()
    ))
}

fn field_out_of_range(
    descriptor: &VariantDescriptor,
    field: &str,
    value: impl std::fmt::Display,
) -> TimestampError {
    debug!(variant = %descriptor.name, field, value = %value, "field out of range");
    TimestampError::out_of_range(format!(
        "{} {} value {} out of range",
        descriptor.name, field, value
    ))
}

fn unrepresentable(descriptor: &VariantDescriptor, what: impl std::fmt::Display) -> TimestampError {
    debug!(variant = %descriptor.name, value = %what, "value not representable");
    TimestampError::unsupported_value(format!("{} cannot represent {}", descriptor.name, what))
}

// ============================================================================
// Validation
// ============================================================================

/// Check that a native value has the variant's shape and lies in its domain
pub fn validate(descriptor: &VariantDescriptor, native: &NativeValue) -> Result<()> {
    match (descriptor.scale, native) {
        (Scale::Ticks { .. }, NativeValue::Ticks(raw)) => {
            if descriptor.domain.contains_integer(*raw) {
                Ok(())
            } else {
                Err(raw_out_of_range(descriptor, raw))
            }
        }
        (Scale::FloatSeconds | Scale::FloatDays, NativeValue::Float(raw)) => {
            if descriptor.domain.contains_float(*raw) {
                Ok(())
            } else {
                Err(raw_out_of_range(descriptor, raw))
            }
        }
        (Scale::Fields(FieldLayout::FatPacked), NativeValue::Packed(raw)) => {
            validate_fields(descriptor, FieldLayout::FatPacked, &unpack_fat(*raw))
        }
        (Scale::Fields(layout), NativeValue::Fields(fields))
            if layout != FieldLayout::FatPacked =>
        {
            validate_fields(descriptor, layout, fields)
        }
        (Scale::Semantic, NativeValue::Label(_)) => Ok(()),
        _ => Err(shape_error(descriptor, native)),
    }
}

fn raw_out_of_range(descriptor: &VariantDescriptor, raw: impl std::fmt::Display) -> TimestampError {
    debug!(variant = %descriptor.name, raw = %raw, "raw value out of range");
    let bounds = match descriptor.domain {
        RawDomain::Integer { min, max } => format!("[{}, {}]", min, max),
        RawDomain::Float { min, max } => format!("[{}, {})", min, max),
        RawDomain::Years { min, max } => format!("years {}-{}", min, max),
        RawDomain::Unbounded => "any value".to_string(),
    };
    TimestampError::out_of_range(format!(
        "{} raw value {} outside {}",
        descriptor.name, raw, bounds
    ))
}

/// Check every sub-field of a struct-based value against its bounds
pub fn validate_fields(
    descriptor: &VariantDescriptor,
    layout: FieldLayout,
    fields: &NativeFields,
) -> Result<()> {
    if !descriptor.domain.contains_year(fields.year) {
        return Err(field_out_of_range(descriptor, "year", fields.year));
    }
    if !(1..=12).contains(&fields.month) {
        return Err(field_out_of_range(descriptor, "month", fields.month));
    }
    let max_day = calendar::days_in_month(fields.year, fields.month)?;
    if fields.day < 1 || fields.day > max_day {
        return Err(field_out_of_range(descriptor, "day", fields.day));
    }

    match fields.time {
        None if !layout.allows_date_only() => {
            return Err(TimestampError::unsupported_value(format!(
                "{} requires a time of day",
                descriptor.name
            )));
        }
        None => {}
        Some((hours, minutes, seconds)) => {
            if hours > 23 {
                return Err(field_out_of_range(descriptor, "hours", hours));
            }
            if minutes > 59 {
                return Err(field_out_of_range(descriptor, "minutes", minutes));
            }
            if seconds > 59 {
                return Err(field_out_of_range(descriptor, "seconds", seconds));
            }
        }
    }

    if fields.subsecond >= layout.subsecond_per_second() {
        return Err(field_out_of_range(descriptor, "fraction of second", fields.subsecond));
    }

    if layout == FieldLayout::Systemtime {
        if fields.weekday > 6 {
            return Err(field_out_of_range(descriptor, "weekday", fields.weekday));
        }
    } else if fields.weekday != 0 {
        return Err(unsupported_field(descriptor, "a weekday"));
    }

    let zone_hours = fields.utc_offset_minutes.unsigned_abs() / 60;
    if layout == FieldLayout::Rfc2579 {
        if zone_hours > 13 {
            return Err(field_out_of_range(descriptor, "hours from UTC", zone_hours));
        }
    } else if fields.utc_offset_minutes != 0 {
        return Err(unsupported_field(descriptor, "a UTC offset"));
    }
    Ok(())
}

fn unsupported_field(descriptor: &VariantDescriptor, what: &str) -> TimestampError {
    debug!(variant = %descriptor.name, field = what, "field not supported");
    TimestampError::unsupported_value(format!("{} does not carry {}", descriptor.name, what))
}

// ============================================================================
// Decoding
// ============================================================================

/// Convert a native value to the normalized timeline
///
/// Semantic labels decode to the epoch.
pub fn decode(descriptor: &VariantDescriptor, native: &NativeValue) -> Result<NormalizedTimestamp> {
    validate(descriptor, native)?;

    match (descriptor.scale, native) {
        (Scale::Ticks { per_second }, NativeValue::Ticks(raw)) => {
            NormalizedTimestamp::from_ticks(*raw, per_second, descriptor.epoch_offset_seconds)
        }
        (Scale::FloatSeconds, NativeValue::Float(raw)) => {
            let seconds = apply_rounding(descriptor, Decimal::from_f64(*raw)?);
            Ok(NormalizedTimestamp::from_decimal(
                seconds.add(&Decimal::from_i64(descriptor.epoch_offset_seconds)),
            ))
        }
        (Scale::FloatDays, NativeValue::Float(raw)) => {
            // divmod: whole days, then the time of day within the day
            let value = Decimal::from_f64(*raw)?;
            let days = value.floor();
            let time_of_day = apply_rounding(
                descriptor,
                value.sub(&days).mul(&Decimal::from_i64(SECONDS_PER_DAY)),
            );
            let seconds = days
                .mul(&Decimal::from_i64(SECONDS_PER_DAY))
                .add(&Decimal::from_i64(descriptor.epoch_offset_seconds))
                .add(&time_of_day);
            Ok(NormalizedTimestamp::from_decimal(seconds))
        }
        (Scale::Fields(layout), NativeValue::Packed(raw)) => {
            fields_to_normalized(layout, &unpack_fat(*raw))
        }
        (Scale::Fields(layout), NativeValue::Fields(fields)) => {
            fields_to_normalized(layout, fields)
        }
        (Scale::Semantic, _) => Ok(NormalizedTimestamp::zero()),
        _ => Err(shape_error(descriptor, native)),
    }
}

fn apply_rounding(descriptor: &VariantDescriptor, seconds: Decimal) -> Decimal {
    match descriptor.rounding {
        Rounding::Truncate => seconds,
        Rounding::NearestMicrosecond => seconds.round_to_places(6),
    }
}

/// Missing time of day counts as midnight; RFC 2579 zones ahead of UTC are subtracted
fn fields_to_normalized(layout: FieldLayout, fields: &NativeFields) -> Result<NormalizedTimestamp> {
    let (hours, minutes, seconds) = fields.time.unwrap_or_default();
    let seconds = calendar::fields_to_seconds(
        fields.year,
        fields.month,
        fields.day,
        Some(hours),
        Some(minutes),
        Some(seconds),
    )
    .ok_or_else(|| {
        TimestampError::unsupported_value(format!(
            "{:04}-{:02}-{:02} cannot be placed on the timeline",
            fields.year, fields.month, fields.day
        ))
    })?;

    let fraction = Decimal::from_ratio(
        fields.subsecond as i128,
        layout.subsecond_per_second() as i128,
    )?;
    let zone = match layout {
        FieldLayout::Rfc2579 => fields.utc_offset_minutes as i64 * 60,
        _ => 0,
    };
    Ok(NormalizedTimestamp::from_parts(seconds - zone, &fraction))
}

// ============================================================================
// Encoding
// ============================================================================

/// Convert UTC calendar fields to the variant's native value
///
/// Sub-tick remainders are truncated. Dates the variant cannot represent
/// fail with `UnsupportedValue`.
pub fn encode(descriptor: &VariantDescriptor, fields: &CalendarFields) -> Result<NativeValue> {
    let microsecond = fields.microsecond().unwrap_or(0) as i128;

    match descriptor.scale {
        Scale::Ticks { per_second } => {
            let seconds = seconds_of(descriptor, fields)? as i128;
            let raw = (seconds - descriptor.epoch_offset_seconds as i128) * per_second
                + microsecond * per_second / MICROSECONDS_PER_SECOND;
            if !descriptor.domain.contains_integer(raw) {
                return Err(unrepresentable(descriptor, format_fields(fields)));
            }
            Ok(NativeValue::Ticks(raw))
        }
        Scale::FloatSeconds | Scale::FloatDays => {
            let seconds = seconds_of(descriptor, fields)?;
            let relative = Decimal::from_i64(seconds - descriptor.epoch_offset_seconds)
                .add(&Decimal::from_ratio(microsecond, MICROSECONDS_PER_SECOND)?);
            let value = match descriptor.scale {
                Scale::FloatDays => relative.checked_div(&Decimal::from_i64(SECONDS_PER_DAY))?,
                _ => relative,
            };
            let raw = value
                .to_f64()
                .filter(|raw| descriptor.domain.contains_float(*raw))
                .ok_or_else(|| unrepresentable(descriptor, format_fields(fields)))?;
            Ok(NativeValue::Float(raw))
        }
        Scale::Fields(layout) => {
            if !descriptor.domain.contains_year(fields.year) {
                return Err(unrepresentable(descriptor, format!("year {}", fields.year)));
            }
            let native = native_fields_from_calendar(layout, fields);
            validate_fields(descriptor, layout, &native)?;
            Ok(match layout {
                FieldLayout::FatPacked => NativeValue::Packed(pack_fat(&native)),
                _ => NativeValue::Fields(native),
            })
        }
        Scale::Semantic => Err(TimestampError::unsupported_value(format!(
            "{} has no calendar encoding",
            descriptor.name
        ))),
    }
}

/// Convert a normalized value to the variant's native value
///
/// Tick variants keep sub-microsecond digits; other variants go through
/// calendar fields.
pub fn encode_normalized(
    descriptor: &VariantDescriptor,
    normalized: &NormalizedTimestamp,
) -> Result<NativeValue> {
    if let Scale::Ticks { per_second } = descriptor.scale {
        return normalized
            .to_ticks(per_second, descriptor.epoch_offset_seconds)
            .filter(|raw| descriptor.domain.contains_integer(*raw))
            .map(NativeValue::Ticks)
            .ok_or_else(|| unrepresentable(descriptor, normalized));
    }

    let (fields, _) = normalized
        .to_calendar()
        .ok_or_else(|| unrepresentable(descriptor, normalized))?;
    encode(descriptor, &fields)
}

fn seconds_of(descriptor: &VariantDescriptor, fields: &CalendarFields) -> Result<i64> {
    fields
        .to_seconds()
        .ok_or_else(|| unrepresentable(descriptor, format_fields(fields)))
}

fn native_fields_from_calendar(layout: FieldLayout, fields: &CalendarFields) -> NativeFields {
    let time = fields.time.map(|t| (t.hour, t.minute, t.second));
    let microsecond = fields.microsecond().unwrap_or(0);
    let mut native = NativeFields::date(fields.year, fields.month, fields.day);

    native.time = if layout.allows_date_only() {
        time
    } else {
        Some(time.unwrap_or_default())
    };
    native.subsecond = match layout {
        FieldLayout::Systemtime => microsecond / 1_000,
        FieldLayout::Rfc2579 => microsecond / 100_000,
        FieldLayout::TimeElements { per_second } if native.time.is_some() => {
            (microsecond as u64 * per_second as u64 / MICROSECONDS_PER_SECOND as u64) as u32
        }
        FieldLayout::TimeElements { .. } | FieldLayout::FatPacked => 0,
    };
    if layout == FieldLayout::Systemtime {
        native.weekday = calendar::day_of_week(fields.year, fields.month, fields.day).unwrap_or(0);
    }
    native
}

fn format_fields(fields: &CalendarFields) -> String {
    match fields.time {
        Some(t) => format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            fields.year, fields.month, fields.day, t.hour, t.minute, t.second
        ),
        None => format!("{:04}-{:02}-{:02}", fields.year, fields.month, fields.day),
    }
}
