//! Variant descriptors: the parameters that drive the generic codec

use serde::Serialize;
use tickstamp_core::{CalendarFields, Precision};

/// How sub-resolution remainders are handled when decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rounding {
    /// Keep the exact value; encoding truncates below one tick
    Truncate,
    /// Floating-point encodings snap to the nearest microsecond
    NearestMicrosecond,
}

/// Layout of a struct-based variant's native sub-fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldLayout {
    /// year, month, weekday, day, hour, minute, second, milliseconds
    Systemtime,
    /// year, month, day, hour, minute, second, deciseconds, UTC zone
    Rfc2579,
    /// year, month, day, optional time, sub-second count at `per_second`
    TimeElements { per_second: u32 },
    /// MS-DOS date in the low 16 bits, time in the high 16 bits
    FatPacked,
}

impl FieldLayout {
    /// Sub-second units per second in this layout (1 when there is none)
    pub fn subsecond_per_second(&self) -> u32 {
        match self {
            FieldLayout::Systemtime => 1_000,
            FieldLayout::Rfc2579 => 10,
            FieldLayout::TimeElements { per_second } => *per_second,
            FieldLayout::FatPacked => 1,
        }
    }

    /// Whether a value may carry a date without a time of day
    pub fn allows_date_only(&self) -> bool {
        matches!(self, FieldLayout::TimeElements { .. })
    }
}

/// Native unit of a variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Scale {
    /// Integer tick counter
    Ticks { per_second: i128 },
    /// Floating-point seconds
    FloatSeconds,
    /// Floating-point days, split into day and time of day by divmod
    FloatDays,
    /// Separate calendar sub-fields
    Fields(FieldLayout),
    /// Opaque label, no numeric value
    Semantic,
}

/// Valid native values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RawDomain {
    /// Inclusive integer bounds
    Integer { min: i128, max: i128 },
    /// Half-open float bounds `[min, max)`
    Float { min: f64, max: f64 },
    /// Inclusive year bounds for struct-based variants
    Years { min: i64, max: i64 },
    Unbounded,
}

impl RawDomain {
    pub fn contains_integer(&self, raw: i128) -> bool {
        match self {
            RawDomain::Integer { min, max } => (*min..=*max).contains(&raw),
            RawDomain::Unbounded => true,
            _ => false,
        }
    }

    pub fn contains_float(&self, raw: f64) -> bool {
        match self {
            RawDomain::Float { min, max } => raw.is_finite() && raw >= *min && raw < *max,
            RawDomain::Unbounded => raw.is_finite(),
            _ => false,
        }
    }

    pub fn contains_year(&self, year: i64) -> bool {
        match self {
            RawDomain::Years { min, max } => (*min..=*max).contains(&year),
            RawDomain::Unbounded => true,
            _ => false,
        }
    }
}

/// Conversion paths a variant supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Strings are parsed as date/time; otherwise they are stored verbatim
    pub string_roundtrip: bool,
    /// Timeline queries compute from the value; otherwise they return zero
    pub timeline_tuple: bool,
    pub iso8601: bool,
}

impl Capabilities {
    pub const NUMERIC: Capabilities = Capabilities {
        string_roundtrip: true,
        timeline_tuple: true,
        iso8601: true,
    };

    pub const LABEL: Capabilities = Capabilities {
        string_roundtrip: false,
        timeline_tuple: false,
        iso8601: false,
    };
}

/// Static description of one timestamp encoding
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// Native epoch as a calendar date, when the encoding has one
    pub epoch: Option<CalendarFields>,
    /// Seconds from 1970-01-01T00:00:00Z to the native epoch
    pub epoch_offset_seconds: i64,
    pub scale: Scale,
    pub domain: RawDomain,
    /// Default rendering precision
    pub precision: Precision,
    pub rounding: Rounding,
    pub is_local_time_default: bool,
    pub capabilities: Capabilities,
}

impl VariantDescriptor {
    /// Ticks per second for scalar tick counters
    pub fn ticks_per_second(&self) -> Option<i128> {
        match self.scale {
            Scale::Ticks { per_second } => Some(per_second),
            _ => None,
        }
    }

    pub fn field_layout(&self) -> Option<FieldLayout> {
        match self.scale {
            Scale::Fields(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn is_struct_based(&self) -> bool {
        matches!(self.scale, Scale::Fields(_))
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self.scale, Scale::Semantic)
    }

    pub fn min_raw(&self) -> Option<i128> {
        match self.domain {
            RawDomain::Integer { min, .. } => Some(min),
            _ => None,
        }
    }

    pub fn max_raw(&self) -> Option<i128> {
        match self.domain {
            RawDomain::Integer { max, .. } => Some(max),
            _ => None,
        }
    }
}
