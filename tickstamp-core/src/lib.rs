//! Tickstamp Core - Fundamental types
//!
//! This crate provides the core types used throughout tickstamp:
//! - `calendar`: Proleptic Gregorian helpers and date/time string parsing
//! - `Precision`: Sub-second precision model
//! - `Decimal`: Arbitrary precision decimal numbers
//! - `NormalizedTimestamp`: Seconds since 1970-01-01T00:00:00Z
//! - `TimestampError`: Structured errors

pub mod calendar;
mod decimal;
mod error;
mod normalized;
mod precision;

pub use calendar::{CalendarFields, ParsedTime, TimeOfDay};
pub use decimal::Decimal;
pub use error::{codes, ErrorReport, Result, TimestampError};
pub use normalized::NormalizedTimestamp;
pub use precision::Precision;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::calendar::{self, CalendarFields, TimeOfDay};
    pub use crate::error::codes;
    pub use crate::{Decimal, NormalizedTimestamp, Precision, Result, TimestampError};
}
