//! Keyword arguments accepted when constructing a variant

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use tickstamp_codec::{Rfc2579Tuple, SystemtimeTuple};
use tickstamp_core::{Precision, Result, TimestampError};

/// Keyword arguments as a JSON object
pub type Kwargs = Map<String, Value>;

/// Typed view of [`Kwargs`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantArgs {
    pub timestamp: Option<Number>,
    pub fat_date_time: Option<u32>,
    pub system_time_tuple: Option<SystemtimeTuple>,
    pub rfc2579_date_time_tuple: Option<Rfc2579Tuple>,
    pub time_elements_tuple: Option<Vec<i64>>,
    pub string: Option<String>,
    pub precision: Option<String>,
    pub is_local_time: Option<bool>,
}

/// Where the initial value of a constructed variant comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    Unset,
    Timestamp(Number),
    FatDateTime(u32),
    SystemtimeTuple(SystemtimeTuple),
    Rfc2579Tuple(Rfc2579Tuple),
    TimeElementsTuple(Vec<i64>),
    String(String),
}

impl VariantArgs {
    pub fn from_kwargs(kwargs: &Kwargs) -> Result<Self> {
        serde_json::from_value(Value::Object(kwargs.clone()))
            .map_err(|e| TimestampError::invalid_argument(e.to_string()))
    }

    /// The single value-bearing argument, if any
    pub fn source(&self) -> Result<ValueSource> {
        let mut sources = Vec::new();
        if let Some(n) = &self.timestamp {
            sources.push(ValueSource::Timestamp(n.clone()));
        }
        if let Some(raw) = self.fat_date_time {
            sources.push(ValueSource::FatDateTime(raw));
        }
        if let Some(t) = self.system_time_tuple {
            sources.push(ValueSource::SystemtimeTuple(t));
        }
        if let Some(t) = self.rfc2579_date_time_tuple {
            sources.push(ValueSource::Rfc2579Tuple(t));
        }
        if let Some(values) = &self.time_elements_tuple {
            sources.push(ValueSource::TimeElementsTuple(values.clone()));
        }
        if let Some(text) = &self.string {
            sources.push(ValueSource::String(text.clone()));
        }

        match sources.len() {
            0 => Ok(ValueSource::Unset),
            1 => Ok(sources.remove(0)),
            n => Err(TimestampError::invalid_argument(format!(
                "expected at most one initial value, got {}",
                n
            ))),
        }
    }

    pub fn precision(&self) -> Result<Option<Precision>> {
        self.precision.as_deref().map(Precision::from_tag).transpose()
    }
}
