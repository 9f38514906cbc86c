//! Tickstamp Registry
//!
//! A name-keyed set of variant factories. Each caller builds its own
//! registry; nothing is global.
//!
//! - `VariantFactory`: constructs one variant from keyword arguments
//! - `BuiltinFactory`: factory for every built-in variant
//! - `VariantRegistry`: register, deregister, look up and construct

mod factory;
mod kwargs;
mod registry;

pub use factory::{ArgMeta, BuiltinFactory, FactoryMeta, VariantFactory};
pub use kwargs::{Kwargs, ValueSource, VariantArgs};
pub use registry::VariantRegistry;

/// Re-export core types for factory authors
pub mod prelude {
    pub use crate::{ArgMeta, BuiltinFactory, FactoryMeta, Kwargs, VariantFactory, VariantRegistry};
    pub use tickstamp_codec::prelude::*;
}
