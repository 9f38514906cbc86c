//! Tickstamp Codec - Timestamp variants and their native encodings
//!
//! Every variant is described by a static `VariantDescriptor`; a single
//! generic codec converts between native values and the normalized
//! timeline using those parameters.
//!
//! Variants:
//! - Tick counters (FILETIME, .NET, UUID, WebKit, POSIX, Java, APFS, HFS)
//! - Floating-point seconds and days (Cocoa, Delphi, OLE Automation)
//! - Struct-based (SYSTEMTIME, RFC 2579, time elements, FAT)
//! - Semantic labels ("Never", "Not set", "Invalid")

pub mod codec;
mod descriptor;
mod native;
mod value;
mod variants;

pub use descriptor::{Capabilities, FieldLayout, RawDomain, Rounding, Scale, VariantDescriptor};
pub use native::{
    pack_fat, unpack_fat, NativeFields, NativeValue, Rfc2579Tuple, SemanticKind, SystemtimeTuple,
};
pub use value::TimestampValue;
pub use variants::Variant;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{NativeFields, NativeValue, TimestampValue, Variant, VariantDescriptor};
    pub use tickstamp_core::prelude::*;
}
