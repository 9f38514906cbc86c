//! Built-in timestamp variants - one descriptor per supported encoding

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tickstamp_core::{CalendarFields, Precision, TimestampError};

use crate::descriptor::{Capabilities, FieldLayout, RawDomain, Rounding, Scale, VariantDescriptor};

/// Every supported timestamp encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    Filetime,
    DotNetDateTime,
    UuidTime,
    WebKitTime,
    PosixTime,
    PosixTimeInMilliseconds,
    PosixTimeInMicroseconds,
    PosixTimeInNanoseconds,
    JavaTime,
    ApfsTime,
    HfsTime,
    CocoaTime,
    DelphiDateTime,
    OleAutomationDate,
    FatDateTime,
    Systemtime,
    Rfc2579DateTime,
    TimeElements,
    TimeElementsInMilliseconds,
    TimeElementsInMicroseconds,
    SemanticTime,
}

impl Variant {
    pub const ALL: [Variant; 21] = [
        Variant::Filetime,
        Variant::DotNetDateTime,
        Variant::UuidTime,
        Variant::WebKitTime,
        Variant::PosixTime,
        Variant::PosixTimeInMilliseconds,
        Variant::PosixTimeInMicroseconds,
        Variant::PosixTimeInNanoseconds,
        Variant::JavaTime,
        Variant::ApfsTime,
        Variant::HfsTime,
        Variant::CocoaTime,
        Variant::DelphiDateTime,
        Variant::OleAutomationDate,
        Variant::FatDateTime,
        Variant::Systemtime,
        Variant::Rfc2579DateTime,
        Variant::TimeElements,
        Variant::TimeElementsInMilliseconds,
        Variant::TimeElementsInMicroseconds,
        Variant::SemanticTime,
    ];

    pub fn descriptor(&self) -> &'static VariantDescriptor {
        match self {
            Variant::Filetime => &FILETIME,
            Variant::DotNetDateTime => &DOTNET_DATETIME,
            Variant::UuidTime => &UUID_TIME,
            Variant::WebKitTime => &WEBKIT_TIME,
            Variant::PosixTime => &POSIX_TIME,
            Variant::PosixTimeInMilliseconds => &POSIX_TIME_MS,
            Variant::PosixTimeInMicroseconds => &POSIX_TIME_US,
            Variant::PosixTimeInNanoseconds => &POSIX_TIME_NS,
            Variant::JavaTime => &JAVA_TIME,
            Variant::ApfsTime => &APFS_TIME,
            Variant::HfsTime => &HFS_TIME,
            Variant::CocoaTime => &COCOA_TIME,
            Variant::DelphiDateTime => &DELPHI_DATETIME,
            Variant::OleAutomationDate => &OLE_AUTOMATION_DATE,
            Variant::FatDateTime => &FAT_DATETIME,
            Variant::Systemtime => &SYSTEMTIME,
            Variant::Rfc2579DateTime => &RFC2579_DATETIME,
            Variant::TimeElements => &TIME_ELEMENTS,
            Variant::TimeElementsInMilliseconds => &TIME_ELEMENTS_MS,
            Variant::TimeElementsInMicroseconds => &TIME_ELEMENTS_US,
            Variant::SemanticTime => &SEMANTIC_TIME,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Case-sensitive lookup by name
    pub fn from_name(name: &str) -> Option<Variant> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Variant {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TimestampError::NotRegistered(s.to_string()))
    }
}

// ============================================================================
// Descriptor table
// ============================================================================

const I64_MIN: i128 = i64::MIN as i128;
const I64_MAX: i128 = i64::MAX as i128;

/// Seconds from 1970-01-01 to 0001-01-01 and 10000-01-01
const YEAR_1_SECONDS: i64 = -62_135_596_800;
const YEAR_10000_SECONDS: i64 = 253_402_300_800;

const fn epoch(year: i64, month: u32, day: u32) -> Option<CalendarFields> {
    Some(CalendarFields {
        year,
        month,
        day,
        time: None,
    })
}

#[allow(clippy::too_many_arguments)]
const fn ticks(
    name: &'static str,
    description: &'static str,
    epoch: Option<CalendarFields>,
    epoch_offset_seconds: i64,
    per_second: i128,
    min: i128,
    max: i128,
    precision: Precision,
) -> VariantDescriptor {
    VariantDescriptor {
        name,
        description,
        epoch,
        epoch_offset_seconds,
        scale: Scale::Ticks { per_second },
        domain: RawDomain::Integer { min, max },
        precision,
        rounding: Rounding::Truncate,
        is_local_time_default: false,
        capabilities: Capabilities::NUMERIC,
    }
}

#[allow(clippy::too_many_arguments)]
const fn fields(
    name: &'static str,
    description: &'static str,
    epoch: Option<CalendarFields>,
    layout: FieldLayout,
    min_year: i64,
    max_year: i64,
    precision: Precision,
    is_local_time_default: bool,
) -> VariantDescriptor {
    VariantDescriptor {
        name,
        description,
        epoch,
        epoch_offset_seconds: 0,
        scale: Scale::Fields(layout),
        domain: RawDomain::Years {
            min: min_year,
            max: max_year,
        },
        precision,
        rounding: Rounding::Truncate,
        is_local_time_default,
        capabilities: Capabilities::NUMERIC,
    }
}

// ----- Tick counters -----

static FILETIME: VariantDescriptor = ticks(
    "Filetime",
    "Windows FILETIME: 100 ns intervals since 1601-01-01",
    epoch(1601, 1, 1),
    -11_644_473_600,
    10_000_000,
    0,
    u64::MAX as i128,
    Precision::HundredNanoseconds,
);

static DOTNET_DATETIME: VariantDescriptor = ticks(
    "DotNetDateTime",
    ".NET DateTime ticks: 100 ns intervals since 0001-01-01",
    epoch(1, 1, 1),
    YEAR_1_SECONDS,
    10_000_000,
    0,
    3_155_378_975_999_999_999,
    Precision::HundredNanoseconds,
);

static UUID_TIME: VariantDescriptor = ticks(
    "UuidTime",
    "UUID version 1 time: 100 ns intervals since 1582-10-15",
    epoch(1582, 10, 15),
    -12_219_292_800,
    10_000_000,
    0,
    (1 << 60) - 1,
    Precision::HundredNanoseconds,
);

static WEBKIT_TIME: VariantDescriptor = ticks(
    "WebKitTime",
    "WebKit time: microseconds since 1601-01-01",
    epoch(1601, 1, 1),
    -11_644_473_600,
    1_000_000,
    I64_MIN,
    I64_MAX,
    Precision::Microseconds,
);

static POSIX_TIME: VariantDescriptor = ticks(
    "PosixTime",
    "POSIX time: seconds since 1970-01-01",
    epoch(1970, 1, 1),
    0,
    1,
    I64_MIN,
    I64_MAX,
    Precision::Seconds,
);

static POSIX_TIME_MS: VariantDescriptor = ticks(
    "PosixTimeInMilliseconds",
    "POSIX time in milliseconds since 1970-01-01",
    epoch(1970, 1, 1),
    0,
    1_000,
    I64_MIN,
    I64_MAX,
    Precision::Milliseconds,
);

static POSIX_TIME_US: VariantDescriptor = ticks(
    "PosixTimeInMicroseconds",
    "POSIX time in microseconds since 1970-01-01",
    epoch(1970, 1, 1),
    0,
    1_000_000,
    I64_MIN,
    I64_MAX,
    Precision::Microseconds,
);

static POSIX_TIME_NS: VariantDescriptor = ticks(
    "PosixTimeInNanoseconds",
    "POSIX time in nanoseconds since 1970-01-01",
    epoch(1970, 1, 1),
    0,
    1_000_000_000,
    I64_MIN,
    I64_MAX,
    Precision::Nanoseconds,
);

static JAVA_TIME: VariantDescriptor = ticks(
    "JavaTime",
    "Java java.util.Date: milliseconds since 1970-01-01",
    epoch(1970, 1, 1),
    0,
    1_000,
    I64_MIN,
    I64_MAX,
    Precision::Milliseconds,
);

static APFS_TIME: VariantDescriptor = ticks(
    "ApfsTime",
    "APFS time: nanoseconds since 1970-01-01",
    epoch(1970, 1, 1),
    0,
    1_000_000_000,
    I64_MIN,
    I64_MAX,
    Precision::Nanoseconds,
);

static HFS_TIME: VariantDescriptor = ticks(
    "HfsTime",
    "HFS time: unsigned 32-bit seconds since 1904-01-01",
    epoch(1904, 1, 1),
    -2_082_844_800,
    1,
    0,
    u32::MAX as i128,
    Precision::Seconds,
);

// ----- Floating point -----

static COCOA_TIME: VariantDescriptor = VariantDescriptor {
    name: "CocoaTime",
    description: "Cocoa NSDate: floating-point seconds since 2001-01-01",
    epoch: epoch(2001, 1, 1),
    epoch_offset_seconds: 978_307_200,
    scale: Scale::FloatSeconds,
    domain: RawDomain::Float {
        min: (YEAR_1_SECONDS - 978_307_200) as f64,
        max: (YEAR_10000_SECONDS - 978_307_200) as f64,
    },
    precision: Precision::Milliseconds,
    rounding: Rounding::NearestMicrosecond,
    is_local_time_default: false,
    capabilities: Capabilities::NUMERIC,
};

/// Day-count domain shared by Delphi and OLE Automation dates
const DAYS_SINCE_1899_12_30: RawDomain = RawDomain::Float {
    min: -693_593.0,
    max: 2_958_466.0,
};

static DELPHI_DATETIME: VariantDescriptor = VariantDescriptor {
    name: "DelphiDateTime",
    description: "Delphi TDateTime: floating-point days since 1899-12-30, local time",
    epoch: epoch(1899, 12, 30),
    epoch_offset_seconds: -2_209_161_600,
    scale: Scale::FloatDays,
    domain: DAYS_SINCE_1899_12_30,
    precision: Precision::Milliseconds,
    rounding: Rounding::NearestMicrosecond,
    is_local_time_default: true,
    capabilities: Capabilities::NUMERIC,
};

static OLE_AUTOMATION_DATE: VariantDescriptor = VariantDescriptor {
    name: "OleAutomationDate",
    description: "OLE Automation date: floating-point days since 1899-12-30",
    epoch: epoch(1899, 12, 30),
    epoch_offset_seconds: -2_209_161_600,
    scale: Scale::FloatDays,
    domain: DAYS_SINCE_1899_12_30,
    precision: Precision::Microseconds,
    rounding: Rounding::NearestMicrosecond,
    is_local_time_default: false,
    capabilities: Capabilities::NUMERIC,
};

// ----- Struct-based -----

static FAT_DATETIME: VariantDescriptor = fields(
    "FatDateTime",
    "FAT date and time: packed 32-bit fields since 1980-01-01, 2 s resolution, local time",
    epoch(1980, 1, 1),
    FieldLayout::FatPacked,
    1980,
    2107,
    Precision::TwoSeconds,
    true,
);

static SYSTEMTIME: VariantDescriptor = fields(
    "Systemtime",
    "Windows SYSTEMTIME structure with milliseconds",
    epoch(1601, 1, 1),
    FieldLayout::Systemtime,
    1601,
    30827,
    Precision::Milliseconds,
    false,
);

static RFC2579_DATETIME: VariantDescriptor = fields(
    "Rfc2579DateTime",
    "RFC 2579 DateAndTime with deciseconds and UTC offset",
    None,
    FieldLayout::Rfc2579,
    0,
    65535,
    Precision::Deciseconds,
    false,
);

static TIME_ELEMENTS: VariantDescriptor = fields(
    "TimeElements",
    "Calendar fields with second resolution",
    None,
    FieldLayout::TimeElements { per_second: 1 },
    1,
    9999,
    Precision::Seconds,
    false,
);

static TIME_ELEMENTS_MS: VariantDescriptor = fields(
    "TimeElementsInMilliseconds",
    "Calendar fields with milliseconds",
    None,
    FieldLayout::TimeElements { per_second: 1_000 },
    1,
    9999,
    Precision::Milliseconds,
    false,
);

static TIME_ELEMENTS_US: VariantDescriptor = fields(
    "TimeElementsInMicroseconds",
    "Calendar fields with microseconds",
    None,
    FieldLayout::TimeElements {
        per_second: 1_000_000,
    },
    1,
    9999,
    Precision::Microseconds,
    false,
);

// ----- Semantic -----

static SEMANTIC_TIME: VariantDescriptor = VariantDescriptor {
    name: "SemanticTime",
    description: "Named placeholder such as \"Never\" or \"Not set\"",
    epoch: None,
    epoch_offset_seconds: 0,
    scale: Scale::Semantic,
    domain: RawDomain::Unbounded,
    precision: Precision::Seconds,
    rounding: Rounding::Truncate,
    is_local_time_default: false,
    capabilities: Capabilities::LABEL,
};
