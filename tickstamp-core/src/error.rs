//! Structured errors for timestamp conversion
//!
//! Every fallible operation in tickstamp returns a [`TimestampError`].
//! Errors are raised at the point of detection and never retried: all
//! conversions are pure, so a retry would fail the same way.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_FORMAT: &str = "INVALID_FORMAT";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
    pub const UNSUPPORTED_VALUE: &str = "UNSUPPORTED_VALUE";
    pub const UNSUPPORTED_PRECISION: &str = "UNSUPPORTED_PRECISION";
    pub const NOT_REGISTERED: &str = "NOT_REGISTERED";
    pub const ALREADY_REGISTERED: &str = "ALREADY_REGISTERED";
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
}

/// Error type for every tickstamp operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Malformed string input: separators, digit counts, non-numeric fields
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A field or raw value violates a stated domain bound
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// A structurally valid value the variant cannot represent
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("Unsupported precision: {0}")]
    UnsupportedPrecision(String),

    #[error("Variant not registered: {0}")]
    NotRegistered(String),

    #[error("Variant already registered: {0}")]
    AlreadyRegistered(String),

    /// Keyword arguments that do not fit the variant being constructed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, TimestampError>;

impl TimestampError {
    // ========== Constructors ==========

    pub fn invalid_format(details: impl Into<String>) -> Self {
        Self::InvalidFormat(details.into())
    }

    pub fn out_of_range(details: impl Into<String>) -> Self {
        Self::OutOfRange(details.into())
    }

    pub fn unsupported_value(details: impl Into<String>) -> Self {
        Self::UnsupportedValue(details.into())
    }

    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument(details.into())
    }

    // ========== Inspection ==========

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => codes::INVALID_FORMAT,
            Self::OutOfRange(_) => codes::OUT_OF_RANGE,
            Self::UnsupportedValue(_) => codes::UNSUPPORTED_VALUE,
            Self::UnsupportedPrecision(_) => codes::UNSUPPORTED_PRECISION,
            Self::NotRegistered(_) => codes::NOT_REGISTERED,
            Self::AlreadyRegistered(_) => codes::ALREADY_REGISTERED,
            Self::InvalidArgument(_) => codes::INVALID_ARGUMENT,
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidFormat(_) => {
                Some("Use YYYY-MM-DD[ hh:mm:ss[.fff|.ffffff]][+hh:mm|-hh:mm]")
            }
            Self::OutOfRange(_) => {
                Some("Check components (month 1-12, day 1-31, hour 0-23, minute 0-59, second 0-59)")
            }
            Self::UnsupportedValue(_) => {
                Some("The date lies outside the range this encoding can represent")
            }
            Self::UnsupportedPrecision(_) => {
                Some("Use one of 1s, 2s, 100ms, 10ms, 1ms, 100us, 10us, 1us, 100ns, 1ns")
            }
            Self::NotRegistered(_) => Some("List registered variants with names()"),
            Self::AlreadyRegistered(_) => Some("Deregister the existing variant first"),
            Self::InvalidArgument(_) => None,
        }
    }

    /// Serializable report for callers shipping errors across a boundary
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
            suggestion: self.suggestion().map(str::to_string),
        }
    }
}

/// Structured, serializable view of a [`TimestampError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(TimestampError::invalid_format("x").code(), codes::INVALID_FORMAT);
        assert_eq!(TimestampError::out_of_range("x").code(), codes::OUT_OF_RANGE);
        assert_eq!(
            TimestampError::NotRegistered("filetime".into()).code(),
            codes::NOT_REGISTERED
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = TimestampError::invalid_format("missing separator").report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "INVALID_FORMAT");
        assert_eq!(json["message"], "Invalid format: missing separator");
        assert!(json["suggestion"].is_string());

        let report = TimestampError::invalid_argument("unknown field").report();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("suggestion").is_none());
    }

    #[test]
    fn test_report_display() {
        let report = TimestampError::AlreadyRegistered("Filetime".into()).report();
        let text = report.to_string();
        assert!(text.starts_with("[ALREADY_REGISTERED] Variant already registered: Filetime"));
        assert!(text.contains("suggestion"));
    }
}
