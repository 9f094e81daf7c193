//! Interop Core - key capability introspection for foreign objects
//!
//! A Ruby-compatible runtime answers `key_info(object, key)` queries from
//! other languages: given an object and a name, which operations are valid on
//! that name? This crate provides the answer as a [`CapabilitySet`].
//!
//! Objects are modelled as a closed set of [`Target`] variants:
//! - [`MappingObject`]: a Hash with name keys
//! - [`AttributedObject`]: a generic object with `attr_*` accessors
//! - [`MetaObject`]: a read-only property bag describing another object
//!
//! Any of them may carry internal attributes (instance variables, named with
//! a leading `@`), which are always reported as `INTERNAL`.

pub mod capability;
pub mod classify;
pub mod error;
pub mod key;
pub mod messages;
pub mod target;
pub mod value;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

// Re-export public API
pub use capability::CapabilitySet;
pub use classify::{classify, key_info};
pub use error::{InteropError, InteropResult};
pub use key::{is_accessor_name, is_internal_name, Key, KeyMode, INTERNAL_SIGIL};
pub use messages::{keys, read, write};
pub use target::{
    Accessor, AttributedObject, InternalAttributes, MappingObject, MetaObject, Target, TargetKind,
};
pub use value::Value;
