//! Variant Registry

use std::collections::HashMap;
use std::sync::Arc;
use tickstamp_codec::{TimestampValue, Variant};
use tickstamp_core::{Result, TimestampError};
use tracing::debug;

use crate::factory::{BuiltinFactory, VariantFactory};
use crate::kwargs::Kwargs;

/// Name-keyed set of variant factories, owned by the caller
#[derive(Clone)]
pub struct VariantRegistry {
    factories: HashMap<String, Arc<dyn VariantFactory>>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry holding every built-in variant under its name
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for variant in Variant::ALL {
            registry
                .factories
                .insert(variant.name().to_string(), Arc::new(BuiltinFactory(variant)));
        }
        registry
    }

    pub fn with_factory<F: VariantFactory + 'static>(mut self, factory: F) -> Result<Self> {
        self.register(factory)?;
        Ok(self)
    }

    pub fn register<F: VariantFactory + 'static>(&mut self, factory: F) -> Result<()> {
        let name = factory.meta().name;
        if self.factories.contains_key(name) {
            return Err(TimestampError::AlreadyRegistered(name.to_string()));
        }
        debug!(variant = name, "registered variant");
        self.factories.insert(name.to_string(), Arc::new(factory));
        Ok(())
    }

    pub fn deregister(&mut self, name: &str) -> Result<Arc<dyn VariantFactory>> {
        let factory = self.factories.remove(name).ok_or_else(|| self.not_registered(name))?;
        debug!(variant = name, "deregistered variant");
        Ok(factory)
    }

    pub fn get(&self, name: &str) -> Option<&dyn VariantFactory> {
        self.factories.get(name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Construct a value of the named variant from keyword arguments
    pub fn create(&self, name: &str, kwargs: &Kwargs) -> Result<TimestampValue> {
        let factory = self.get(name).ok_or_else(|| self.not_registered(name))?;
        let value = factory.create(kwargs)?;
        debug!(variant = name, is_set = value.is_set(), "constructed variant");
        Ok(value)
    }

    fn not_registered(&self, name: &str) -> TimestampError {
        let similar = self.find_similar(name);
        if similar.is_empty() {
            TimestampError::NotRegistered(name.to_string())
        } else {
            TimestampError::NotRegistered(format!("{} (similar: {})", name, similar.join(", ")))
        }
    }

    /// Registered names differing from `name` only by case, or containing it
    fn find_similar(&self, name: &str) -> Vec<&str> {
        let query = name.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let mut similar: Vec<&str> = self
            .factories
            .keys()
            .filter(|candidate| candidate.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect();
        similar.sort_unstable();
        similar.truncate(5);
        similar
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VariantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantRegistry").field("names", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{ArgMeta, FactoryMeta};
    use serde_json::{json, Value};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    }

    fn kwargs(value: Value) -> Kwargs {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    /// POSIX seconds counted from 2000-01-01
    struct Y2kTime;

    static Y2K_ARGS: &[ArgMeta] =
        &[ArgMeta::required("seconds", "Integer", "Seconds since 2000-01-01")];

    impl VariantFactory for Y2kTime {
        fn meta(&self) -> FactoryMeta {
            FactoryMeta {
                name: "Y2kTime",
                description: "Seconds since 2000-01-01",
                args: Y2K_ARGS,
            }
        }

        fn create(&self, kwargs: &Kwargs) -> Result<TimestampValue> {
            let seconds = kwargs
                .get("seconds")
                .and_then(Value::as_i64)
                .ok_or_else(|| TimestampError::invalid_argument("seconds is required"))?;
            TimestampValue::from_raw(Variant::PosixTime, i128::from(seconds) + 946_684_800)
        }
    }

    #[test]
    fn test_builtin_names() {
        let registry = VariantRegistry::with_builtin();
        assert_eq!(registry.len(), Variant::ALL.len());
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(registry.contains("Filetime"));
        assert!(!registry.contains("filetime"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = VariantRegistry::new();
        assert!(registry.is_empty());
        let err = registry.create("Filetime", &Kwargs::new()).unwrap_err();
        assert!(matches!(err, TimestampError::NotRegistered(_)));
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = VariantRegistry::with_builtin();
        let err = registry.register(BuiltinFactory(Variant::PosixTime)).unwrap_err();
        assert!(matches!(err, TimestampError::AlreadyRegistered(_)));
        assert_eq!(err.code(), tickstamp_core::codes::ALREADY_REGISTERED);
    }

    #[test]
    fn test_deregister() {
        init_tracing();
        let mut registry = VariantRegistry::with_builtin();
        let factory = registry.deregister("HfsTime").unwrap();
        assert_eq!(factory.meta().name, "HfsTime");
        assert!(!registry.contains("HfsTime"));
        assert!(matches!(registry.deregister("HfsTime"), Err(TimestampError::NotRegistered(_))));

        registry.register(BuiltinFactory(Variant::HfsTime)).unwrap();
        assert!(registry.contains("HfsTime"));
    }

    #[test]
    fn test_not_registered_suggests_similar() {
        let registry = VariantRegistry::with_builtin();
        let result = registry.create("filetime", &Kwargs::new());
        let Err(TimestampError::NotRegistered(message)) = result else {
            panic!("expected NotRegistered");
        };
        assert_eq!(message, "filetime (similar: Filetime)");
    }

    #[test]
    fn test_create_builtin() {
        init_tracing();
        let registry = VariantRegistry::with_builtin();
        let value = registry
            .create("PosixTime", &kwargs(json!({"string": "2010-08-12 21:06:31"})))
            .unwrap();
        assert_eq!(value.variant(), Variant::PosixTime);
        assert_eq!(value.raw_ticks(), Some(1_281_647_191));
    }

    #[test]
    fn test_custom_factory() {
        init_tracing();
        let registry = VariantRegistry::new().with_factory(Y2kTime).unwrap();
        assert_eq!(registry.names(), vec!["Y2kTime"]);

        let value = registry.create("Y2kTime", &kwargs(json!({"seconds": 0}))).unwrap();
        assert_eq!(value.copy_to_string().unwrap(), "2000-01-01 00:00:00");

        let err = registry.create("Y2kTime", &Kwargs::new()).unwrap_err();
        assert!(matches!(err, TimestampError::InvalidArgument(_)));
    }

    #[test]
    fn test_registries_are_independent() {
        let mut first = VariantRegistry::with_builtin();
        let second = first.clone();
        first.deregister("Filetime").unwrap();
        assert!(!first.contains("Filetime"));
        assert!(second.contains("Filetime"));
    }
}
