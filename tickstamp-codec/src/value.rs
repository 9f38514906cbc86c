//! Timestamp value - a native value tagged with its variant

use std::cmp::Ordering;
use std::sync::OnceLock;
use tickstamp_core::{
    calendar, CalendarFields, Decimal, NormalizedTimestamp, Precision, Result, TimestampError,
};
use tracing::trace;

use crate::codec;
use crate::descriptor::{FieldLayout, Scale, VariantDescriptor};
use crate::native::{pack_fat, NativeFields, NativeValue, SemanticKind};
use crate::Variant;

/// A timestamp in one variant's native encoding
///
/// Either unset or holding a validated native value. The normalized
/// timeline value is computed on first use and cached until the native
/// value is reassigned.
#[derive(Debug, Clone)]
pub struct TimestampValue {
    variant: Variant,
    native: Option<NativeValue>,
    precision: Precision,
    is_local_time: bool,
    normalized: OnceLock<Option<NormalizedTimestamp>>,
}

/// Position on the timeline, with semantic labels placed around instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TimelineKey<'a> {
    Before(SemanticKind),
    Instant(&'a NormalizedTimestamp),
    After,
}

impl TimestampValue {
    // ========== Construction ==========

    /// Unset value of the given variant
    pub fn new(variant: Variant) -> Self {
        let descriptor = variant.descriptor();
        TimestampValue {
            variant,
            native: None,
            precision: descriptor.precision,
            is_local_time: descriptor.is_local_time_default,
            normalized: OnceLock::new(),
        }
    }

    fn with_native(variant: Variant, native: NativeValue) -> Result<Self> {
        codec::validate(variant.descriptor(), &native)?;
        let mut value = Self::new(variant);
        value.native = Some(native);
        Ok(value)
    }

    fn wrong_shape(variant: Variant, what: &str) -> TimestampError {
        TimestampError::unsupported_value(format!("{} does not take {}", variant, what))
    }

    /// From an integer: a tick count, or a packed FAT date/time word
    pub fn from_raw(variant: Variant, raw: i128) -> Result<Self> {
        let native = match variant.descriptor().scale {
            Scale::Ticks { .. } => NativeValue::Ticks(raw),
            Scale::Fields(FieldLayout::FatPacked) => {
                let packed = u32::try_from(raw).map_err(|_| {
                    TimestampError::out_of_range(format!(
                        "{} raw value {} is not a 32-bit word",
                        variant, raw
                    ))
                })?;
                NativeValue::Packed(packed)
            }
            _ => return Err(Self::wrong_shape(variant, "an integer value")),
        };
        Self::with_native(variant, native)
    }

    pub fn from_float(variant: Variant, raw: f64) -> Result<Self> {
        match variant.descriptor().scale {
            Scale::FloatSeconds | Scale::FloatDays => {
                Self::with_native(variant, NativeValue::Float(raw))
            }
            _ => Err(Self::wrong_shape(variant, "a floating-point value")),
        }
    }

    /// From native sub-fields; FAT values are packed after validation
    pub fn from_fields(variant: Variant, fields: NativeFields) -> Result<Self> {
        let descriptor = variant.descriptor();
        match descriptor.scale {
            Scale::Fields(FieldLayout::FatPacked) => {
                codec::validate_fields(descriptor, FieldLayout::FatPacked, &fields)?;
                Self::with_native(variant, NativeValue::Packed(pack_fat(&fields)))
            }
            Scale::Fields(_) => Self::with_native(variant, NativeValue::Fields(fields)),
            _ => Err(Self::wrong_shape(variant, "calendar fields")),
        }
    }

    /// Semantic value such as "Never" or "Not set"
    pub fn from_label(label: impl Into<String>) -> Self {
        let mut value = Self::new(Variant::SemanticTime);
        value.native = Some(NativeValue::Label(label.into()));
        value
    }

    /// Parse `YYYY-MM-DD[ hh:mm:ss[.fff|.ffffff]][±hh:mm]`
    pub fn from_string(variant: Variant, text: &str) -> Result<Self> {
        let mut value = Self::new(variant);
        value.copy_from_string(text)?;
        Ok(value)
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_local_time(mut self, is_local_time: bool) -> Self {
        self.is_local_time = is_local_time;
        self
    }

    // ========== Queries ==========

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn descriptor(&self) -> &'static VariantDescriptor {
        self.variant.descriptor()
    }

    pub fn is_set(&self) -> bool {
        self.native.is_some()
    }

    pub fn is_local_time(&self) -> bool {
        self.is_local_time
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn native(&self) -> Option<&NativeValue> {
        self.native.as_ref()
    }

    pub fn raw_ticks(&self) -> Option<i128> {
        match self.native {
            Some(NativeValue::Ticks(raw)) => Some(raw),
            _ => None,
        }
    }

    pub fn raw_float(&self) -> Option<f64> {
        match self.native {
            Some(NativeValue::Float(raw)) => Some(raw),
            _ => None,
        }
    }

    pub fn raw_packed(&self) -> Option<u32> {
        match self.native {
            Some(NativeValue::Packed(raw)) => Some(raw),
            _ => None,
        }
    }

    pub fn native_fields(&self) -> Option<&NativeFields> {
        match &self.native {
            Some(NativeValue::Fields(fields)) => Some(fields),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.native {
            Some(NativeValue::Label(label)) => Some(label),
            _ => None,
        }
    }

    /// Seconds since 1970-01-01T00:00:00Z, `None` while unset
    pub fn normalized(&self) -> Option<&NormalizedTimestamp> {
        self.normalized
            .get_or_init(|| {
                let native = self.native.as_ref()?;
                codec::decode(self.descriptor(), native).ok()
            })
            .as_ref()
    }

    /// Calendar fields and exact fraction; date-only values keep their time absent
    fn calendar_parts(&self) -> Option<(CalendarFields, Decimal)> {
        if !self.descriptor().capabilities.timeline_tuple {
            return None;
        }
        if let Some(NativeValue::Fields(fields)) = &self.native {
            if fields.time.is_none() {
                let date = CalendarFields::date(fields.year, fields.month, fields.day);
                return Some((date, Decimal::zero()));
            }
        }
        self.normalized()?.to_calendar()
    }

    pub fn to_calendar_fields(&self) -> Option<CalendarFields> {
        self.calendar_parts().map(|(fields, _)| fields)
    }

    /// `YYYY-MM-DD hh:mm:ss[.fraction]` at this value's precision
    pub fn copy_to_string(&self) -> Option<String> {
        if let Some(label) = self.label() {
            return Some(label.to_string());
        }
        let (fields, fraction) = self.calendar_parts()?;
        self.precision.format_date_time(&fields, &fraction).ok()
    }

    /// `YYYY-MM-DDThh:mm:ss[.fraction]`, with `Z` unless the value is local time
    pub fn copy_to_string_iso8601(&self) -> Option<String> {
        if !self.descriptor().capabilities.iso8601 {
            return None;
        }
        let (fields, fraction) = self.calendar_parts()?;
        self.precision
            .format_iso8601(&fields, &fraction, !self.is_local_time)
            .ok()
    }

    /// `(seconds, remainder in 100 ns)`; semantic values yield `(0, 0)`
    pub fn to_timeline_tuple(&self) -> Option<(i64, u32)> {
        self.native.as_ref()?;
        if !self.descriptor().capabilities.timeline_tuple {
            return Some((0, 0));
        }
        self.normalized()?.to_timeline_tuple()
    }

    /// Microseconds since 1970-01-01; semantic values yield 0
    pub fn to_microsecond_timestamp(&self) -> Option<i64> {
        self.native.as_ref()?;
        if !self.descriptor().capabilities.timeline_tuple {
            return Some(0);
        }
        self.normalized()?.to_microseconds()
    }

    fn timeline_key(&self) -> Option<TimelineKey<'_>> {
        match self.native.as_ref()? {
            NativeValue::Label(label) => Some(match SemanticKind::of(label) {
                SemanticKind::Never => TimelineKey::After,
                kind => TimelineKey::Before(kind),
            }),
            _ => self.normalized().map(TimelineKey::Instant),
        }
    }

    /// Order two values on the timeline, across variants
    ///
    /// "Never" sorts after every instant, other labels before. `None` when
    /// either value is unset.
    pub fn timeline_cmp(&self, other: &TimestampValue) -> Option<Ordering> {
        Some(self.timeline_key()?.cmp(&other.timeline_key()?))
    }

    /// Re-encode this value's instant in another variant
    pub fn convert_to(&self, target: Variant) -> Result<TimestampValue> {
        if !self.descriptor().capabilities.timeline_tuple {
            return Err(TimestampError::unsupported_value(format!(
                "{} values have no instant",
                self.variant
            )));
        }
        let normalized = self.normalized().ok_or_else(|| {
            TimestampError::unsupported_value(format!("{} value is not set", self.variant))
        })?;

        let native = codec::encode_normalized(target.descriptor(), normalized)?;
        let mut value = Self::new(target).with_local_time(self.is_local_time);
        value.native = Some(native);
        Ok(value)
    }

    // ========== Mutation ==========

    fn assign(&mut self, native: NativeValue) {
        self.native = Some(native);
        self.normalized = OnceLock::new();
        self.is_local_time = false;
    }

    /// Parse `YYYY-MM-DD[ hh:mm:ss[.fff|.ffffff]][±hh:mm]` into this value
    ///
    /// Semantic values store the text as their label.
    pub fn copy_from_string(&mut self, text: &str) -> Result<()> {
        let descriptor = self.descriptor();
        if !descriptor.capabilities.string_roundtrip {
            self.assign(NativeValue::Label(text.to_string()));
            return Ok(());
        }

        let fields = calendar::parse_date_time(text)?;
        let native = codec::encode(descriptor, &fields)?;
        trace!(variant = %descriptor.name, input = text, "copied from string");
        self.assign(native);
        Ok(())
    }

    /// Parse `YYYY-MM-DDThh:mm:ss[(.|,)fff|ffffff][Z|±hh:mm]` into this value
    pub fn copy_from_string_iso8601(&mut self, text: &str) -> Result<()> {
        let descriptor = self.descriptor();
        if !descriptor.capabilities.iso8601 {
            return Err(TimestampError::unsupported_value(format!(
                "{} does not support ISO 8601 strings",
                descriptor.name
            )));
        }

        let fields = calendar::parse_iso8601(text)?;
        let native = codec::encode(descriptor, &fields)?;
        trace!(variant = %descriptor.name, input = text, "copied from ISO 8601 string");
        self.assign(native);
        Ok(())
    }
}
