//! Variant factories

use serde::Serialize;
use tickstamp_codec::{FieldLayout, NativeFields, Scale, TimestampValue, Variant};
use tickstamp_core::{Result, TimestampError};

use crate::kwargs::{Kwargs, ValueSource, VariantArgs};

/// Metadata about a keyword argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ArgMeta {
    pub const fn required(
        name: &'static str,
        typ: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            typ,
            description,
            optional: false,
            default: None,
        }
    }

    pub const fn optional(
        name: &'static str,
        typ: &'static str,
        description: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            typ,
            description,
            optional: true,
            default: Some(default),
        }
    }
}

/// Metadata for a variant factory
#[derive(Debug, Clone, Serialize)]
pub struct FactoryMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub args: &'static [ArgMeta],
}

/// Constructs timestamp values of one variant from keyword arguments
pub trait VariantFactory: Send + Sync {
    fn meta(&self) -> FactoryMeta;
    fn create(&self, kwargs: &Kwargs) -> Result<TimestampValue>;
}

// ========== Built-in argument lists ==========

const STRING: ArgMeta = ArgMeta::optional(
    "string",
    "String",
    "Date and time string YYYY-MM-DD[ hh:mm:ss[.ffffff]][±hh:mm]",
    "unset",
);
const PRECISION: ArgMeta = ArgMeta::optional(
    "precision",
    "String",
    "Rendering precision tag such as 1ms",
    "variant default",
);
const IS_LOCAL_TIME: ArgMeta = ArgMeta::optional(
    "is_local_time",
    "Bool",
    "Whether the value is in local time",
    "variant default",
);

static TICK_ARGS: &[ArgMeta] = &[
    ArgMeta::optional("timestamp", "Integer", "Tick count since the epoch", "unset"),
    STRING,
    PRECISION,
    IS_LOCAL_TIME,
];

static FLOAT_ARGS: &[ArgMeta] = &[
    ArgMeta::optional("timestamp", "Float", "Seconds or days since the epoch", "unset"),
    STRING,
    PRECISION,
    IS_LOCAL_TIME,
];

static FAT_ARGS: &[ArgMeta] = &[
    ArgMeta::optional(
        "fat_date_time",
        "Integer",
        "Packed FAT date in the low 16 bits, time in the high 16",
        "unset",
    ),
    STRING,
    PRECISION,
    IS_LOCAL_TIME,
];

static SYSTEMTIME_ARGS: &[ArgMeta] = &[
    ArgMeta::optional(
        "system_time_tuple",
        "List",
        "[year, month, weekday, day, hours, minutes, seconds, milliseconds]",
        "unset",
    ),
    STRING,
    PRECISION,
    IS_LOCAL_TIME,
];

static RFC2579_ARGS: &[ArgMeta] = &[
    ArgMeta::optional(
        "rfc2579_date_time_tuple",
        "List",
        "[year, month, day, hours, minutes, seconds, deciseconds, direction, \
         hours_from_utc, minutes_from_utc]",
        "unset",
    ),
    STRING,
    PRECISION,
    IS_LOCAL_TIME,
];

static TIME_ELEMENTS_ARGS: &[ArgMeta] = &[
    ArgMeta::optional(
        "time_elements_tuple",
        "List",
        "[year, month, day, hours, minutes, seconds] plus a sub-second count \
         for the fractional variants",
        "unset",
    ),
    STRING,
    PRECISION,
    IS_LOCAL_TIME,
];

static SEMANTIC_ARGS: &[ArgMeta] = &[ArgMeta::optional(
    "string",
    "String",
    "Label such as Never or Not set",
    "unset",
)];

/// Factory for one of the built-in variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinFactory(pub Variant);

impl BuiltinFactory {
    fn args(&self) -> &'static [ArgMeta] {
        match self.0.descriptor().scale {
            Scale::Ticks { .. } => TICK_ARGS,
            Scale::FloatSeconds | Scale::FloatDays => FLOAT_ARGS,
            Scale::Fields(FieldLayout::FatPacked) => FAT_ARGS,
            Scale::Fields(FieldLayout::Systemtime) => SYSTEMTIME_ARGS,
            Scale::Fields(FieldLayout::Rfc2579) => RFC2579_ARGS,
            Scale::Fields(FieldLayout::TimeElements { .. }) => TIME_ELEMENTS_ARGS,
            Scale::Semantic => SEMANTIC_ARGS,
        }
    }

    fn from_source(&self, source: ValueSource) -> Result<TimestampValue> {
        let variant = self.0;
        match source {
            ValueSource::Unset => Ok(TimestampValue::new(variant)),
            ValueSource::Timestamp(number) => match variant.descriptor().scale {
                Scale::FloatSeconds | Scale::FloatDays => {
                    let raw = number.as_f64().ok_or_else(|| {
                        TimestampError::invalid_argument(format!(
                            "timestamp {} is not a number",
                            number
                        ))
                    })?;
                    TimestampValue::from_float(variant, raw)
                }
                _ => {
                    let raw = number
                        .as_i64()
                        .map(i128::from)
                        .or_else(|| number.as_u64().map(i128::from))
                        .ok_or_else(|| {
                            TimestampError::invalid_argument(format!(
                                "{} takes an integer timestamp, got {}",
                                variant, number
                            ))
                        })?;
                    TimestampValue::from_raw(variant, raw)
                }
            },
            ValueSource::FatDateTime(raw) => TimestampValue::from_raw(variant, i128::from(raw)),
            ValueSource::SystemtimeTuple(t) => {
                TimestampValue::from_fields(variant, NativeFields::from_systemtime_tuple(t))
            }
            ValueSource::Rfc2579Tuple(t) => {
                TimestampValue::from_fields(variant, NativeFields::from_rfc2579_tuple(t)?)
            }
            ValueSource::TimeElementsTuple(values) => {
                let with_subsecond = matches!(
                    variant.descriptor().field_layout(),
                    Some(FieldLayout::TimeElements { per_second }) if per_second > 1
                );
                let fields = NativeFields::from_time_elements_tuple(&values, with_subsecond)?;
                TimestampValue::from_fields(variant, fields)
            }
            ValueSource::String(text) => TimestampValue::from_string(variant, &text),
        }
    }
}

impl VariantFactory for BuiltinFactory {
    fn meta(&self) -> FactoryMeta {
        let descriptor = self.0.descriptor();
        FactoryMeta {
            name: descriptor.name,
            description: descriptor.description,
            args: self.args(),
        }
    }

    fn create(&self, kwargs: &Kwargs) -> Result<TimestampValue> {
        let args = self.args();
        let unknown = kwargs
            .keys()
            .find(|key| !args.iter().any(|arg| arg.name == key.as_str()));
        if let Some(key) = unknown {
            return Err(TimestampError::invalid_argument(format!(
                "{} does not take '{}'",
                self.0, key
            )));
        }

        let parsed = VariantArgs::from_kwargs(kwargs)?;
        let mut value = self.from_source(parsed.source()?)?;
        if let Some(precision) = parsed.precision()? {
            value = value.with_precision(precision);
        }
        if let Some(is_local_time) = parsed.is_local_time {
            value = value.with_local_time(is_local_time);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tickstamp_core::Precision;

    fn kwargs(value: Value) -> Kwargs {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn create(variant: Variant, value: Value) -> Result<TimestampValue> {
        BuiltinFactory(variant).create(&kwargs(value))
    }

    #[test]
    fn test_meta() {
        let meta = BuiltinFactory(Variant::FatDateTime).meta();
        assert_eq!(meta.name, "FatDateTime");
        assert!(meta.args.iter().any(|a| a.name == "fat_date_time"));
        assert!(meta.args.iter().all(|a| a.optional));

        let meta = BuiltinFactory(Variant::SemanticTime).meta();
        assert_eq!(meta.args.len(), 1);
    }

    #[test]
    fn test_meta_serializes() {
        let json = serde_json::to_value(BuiltinFactory(Variant::PosixTime).meta()).unwrap();
        assert_eq!(json["name"], "PosixTime");
        assert_eq!(json["args"][0]["name"], "timestamp");
        assert_eq!(json["args"][0]["typ"], "Integer");
    }

    #[test]
    fn test_create_unset() {
        let value = create(Variant::Filetime, json!({})).unwrap();
        assert!(!value.is_set());
    }

    #[test]
    fn test_create_from_timestamp() {
        let value =
            create(Variant::Filetime, json!({"timestamp": 0x01cb_3a62_3d0a_17ce_u64})).unwrap();
        assert_eq!(value.copy_to_string().unwrap(), "2010-08-12 21:06:31.5468750");

        let value = create(Variant::Filetime, json!({"timestamp": u64::MAX})).unwrap();
        assert_eq!(value.raw_ticks(), Some(u64::MAX as i128));

        let value = create(Variant::CocoaTime, json!({"timestamp": 303_339_991})).unwrap();
        assert_eq!(value.raw_float(), Some(303_339_991.0));

        let err = create(Variant::PosixTime, json!({"timestamp": 1.5})).unwrap_err();
        assert!(matches!(err, TimestampError::InvalidArgument(_)));
    }

    #[test]
    fn test_create_fat() {
        let value =
            create(Variant::FatDateTime, json!({"fat_date_time": 0xa8d0_3d0c_u32})).unwrap();
        assert_eq!(value.copy_to_string().unwrap(), "2010-08-12 21:06:32");

        let err = create(Variant::FatDateTime, json!({"timestamp": 0})).unwrap_err();
        assert!(matches!(err, TimestampError::InvalidArgument(_)));
    }

    #[test]
    fn test_create_from_tuples() {
        let value = create(
            Variant::Systemtime,
            json!({"system_time_tuple": [2010, 8, 4, 12, 20, 6, 31, 142]}),
        )
        .unwrap();
        assert_eq!(value.copy_to_string().unwrap(), "2010-08-12 20:06:31.142");

        let value = create(
            Variant::Rfc2579DateTime,
            json!({"rfc2579_date_time_tuple": [2010, 8, 12, 20, 6, 31, 6, "+", 1, 0]}),
        )
        .unwrap();
        assert_eq!(value.copy_to_string().unwrap(), "2010-08-12 19:06:31.6");

        let value = create(
            Variant::TimeElementsInMilliseconds,
            json!({"time_elements_tuple": [2010, 8, 12, 20, 6, 31, 546]}),
        )
        .unwrap();
        assert_eq!(value.copy_to_string().unwrap(), "2010-08-12 20:06:31.546");

        let err = create(
            Variant::TimeElements,
            json!({"time_elements_tuple": [2010, 8, 12, 20, 6, 31, 546]}),
        )
        .unwrap_err();
        assert!(matches!(err, TimestampError::UnsupportedValue(_)));
    }

    #[test]
    fn test_create_out_of_range_tuple() {
        let err = create(
            Variant::Systemtime,
            json!({"system_time_tuple": [2010, 13, 4, 12, 20, 6, 31, 142]}),
        )
        .unwrap_err();
        assert!(matches!(err, TimestampError::OutOfRange(_)));
    }

    #[test]
    fn test_create_options() {
        let value = create(
            Variant::Filetime,
            json!({
                "string": "2010-08-12 21:06:31.546875",
                "precision": "1ms",
                "is_local_time": true
            }),
        )
        .unwrap();
        assert_eq!(value.precision(), Precision::Milliseconds);
        assert!(value.is_local_time());
        assert_eq!(value.copy_to_string().unwrap(), "2010-08-12 21:06:31.546");
        assert_eq!(value.copy_to_string_iso8601().unwrap(), "2010-08-12T21:06:31.546");
    }

    #[test]
    fn test_create_semantic() {
        let value = create(Variant::SemanticTime, json!({"string": "Never"})).unwrap();
        assert_eq!(value.label(), Some("Never"));

        let err = create(Variant::SemanticTime, json!({"precision": "1s"})).unwrap_err();
        assert!(matches!(err, TimestampError::InvalidArgument(_)));
    }
}
