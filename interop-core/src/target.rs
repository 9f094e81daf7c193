//! Foreign objects that keys are classified against.
//!
//! Targets form a closed set of variants. Each carries exactly the state the
//! classifier consults: its names (entries, accessors or properties), its
//! internal attributes, and its frozen flag.

use crate::error::InteropError;
use crate::key::{is_accessor_name, is_internal_name};
use crate::value::Value;
use indexmap::IndexMap;

/// Discriminant for the target variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Mapping,
    Attributed,
    Meta,
}

impl TargetKind {
    /// Host class name reported for targets of this kind
    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::Mapping => "Hash",
            TargetKind::Attributed => "Object",
            TargetKind::Meta => "MetaObject",
        }
    }
}

/// A foreign object that keys can be queried on
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Mapping(MappingObject),
    Attributed(AttributedObject),
    Meta(MetaObject),
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Mapping(_) => TargetKind::Mapping,
            Target::Attributed(_) => TargetKind::Attributed,
            Target::Meta(_) => TargetKind::Meta,
        }
    }

    /// Whether the target rejects writes. Meta objects are always read-only
    /// but are not frozen in the host sense.
    pub fn is_frozen(&self) -> bool {
        match self {
            Target::Mapping(mapping) => mapping.is_frozen(),
            Target::Attributed(object) => object.is_frozen(),
            Target::Meta(_) => false,
        }
    }

    /// Freeze the target. Freezing a meta object has no effect.
    pub fn freeze(&mut self) {
        match self {
            Target::Mapping(mapping) => mapping.freeze(),
            Target::Attributed(object) => object.freeze(),
            Target::Meta(_) => {}
        }
    }

    pub fn internals(&self) -> Option<&InternalAttributes> {
        match self {
            Target::Mapping(mapping) => Some(mapping.internals()),
            Target::Attributed(object) => Some(object.internals()),
            Target::Meta(_) => None,
        }
    }

    /// Set an internal attribute, creating it if needed
    pub fn set_internal(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<(), InteropError> {
        match self {
            Target::Mapping(mapping) => mapping.set_internal(name, value),
            Target::Attributed(object) => object.set_internal(name, value),
            Target::Meta(_) => Err(InteropError::FrozenTarget {
                key: name.into(),
                target: TargetKind::Meta.name().to_string(),
            }),
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            Target::Mapping(mapping) => mapping.to_display_string(),
            Target::Attributed(object) => object.to_display_string(),
            Target::Meta(meta) => meta.to_display_string(),
        }
    }
}

impl From<MappingObject> for Target {
    fn from(mapping: MappingObject) -> Self {
        Target::Mapping(mapping)
    }
}

impl From<AttributedObject> for Target {
    fn from(object: AttributedObject) -> Self {
        Target::Attributed(object)
    }
}

impl From<MetaObject> for Target {
    fn from(meta: MetaObject) -> Self {
        Target::Meta(meta)
    }
}

/// Instance variables of an object, in assignment order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalAttributes {
    slots: IndexMap<String, Value>,
}

impl InternalAttributes {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn set(&mut self, name: String, value: Value) -> Result<(), InteropError> {
        if !is_internal_name(&name) {
            return Err(InteropError::InvalidInternalName { name });
        }
        self.slots.insert(name, value);
        Ok(())
    }

    fn display_fields(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|(name, value)| format!("{}={}", name, value.to_display_string()))
            .collect()
    }
}

fn frozen_error(key: String, target: TargetKind) -> InteropError {
    InteropError::FrozenTarget {
        key,
        target: target.name().to_string(),
    }
}

/// An ordered name → value collection (a Hash with name keys)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingObject {
    entries: IndexMap<String, Value>,
    internals: InternalAttributes,
    frozen: bool,
}

impl MappingObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an unfrozen mapping from entries, keeping their order
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
            ..Self::default()
        }
    }

    pub fn entry(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains_entry(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Result<(), InteropError> {
        let name = name.into();
        if self.frozen {
            return Err(frozen_error(name, TargetKind::Mapping));
        }
        self.entries.insert(name, value);
        Ok(())
    }

    pub fn internals(&self) -> &InternalAttributes {
        &self.internals
    }

    pub fn set_internal(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<(), InteropError> {
        let name = name.into();
        if self.frozen {
            return Err(frozen_error(name, TargetKind::Mapping));
        }
        self.internals.set(name, value)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn to_display_string(&self) -> String {
        let entries: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| format!("{:?} => {}", name, value.to_display_string()))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}

/// Which halves of an attribute accessor are defined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Accessor {
    pub reader: bool,
    pub writer: bool,
}

impl Accessor {
    pub const READER: Accessor = Accessor {
        reader: true,
        writer: false,
    };
    pub const WRITER: Accessor = Accessor {
        reader: false,
        writer: true,
    };
    pub const BOTH: Accessor = Accessor {
        reader: true,
        writer: true,
    };

    /// Combine two accessor definitions for the same name
    pub fn merge(self, other: Accessor) -> Accessor {
        Accessor {
            reader: self.reader || other.reader,
            writer: self.writer || other.writer,
        }
    }
}

/// A generic object exposing named accessors and instance variables
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedObject {
    class_name: String,
    accessors: IndexMap<String, Accessor>,
    internals: InternalAttributes,
    frozen: bool,
}

impl AttributedObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            accessors: IndexMap::new(),
            internals: InternalAttributes::default(),
            frozen: false,
        }
    }

    /// Create an instance with an existing accessor table
    pub fn with_accessors<K, I>(
        class_name: impl Into<String>,
        accessors: I,
    ) -> Result<Self, InteropError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Accessor)>,
    {
        let mut object = Self::new(class_name);
        for (name, accessor) in accessors {
            object.define(name, accessor)?;
        }
        Ok(object)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Define accessor halves for a name, merging with any existing definition.
    ///
    /// The name must be able to back an instance variable `@name`.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        accessor: Accessor,
    ) -> Result<(), InteropError> {
        let name = name.into();
        if !is_accessor_name(&name) {
            return Err(InteropError::InvalidAccessorName { name });
        }
        let slot = self.accessors.entry(name).or_default();
        *slot = slot.merge(accessor);
        Ok(())
    }

    pub fn define_reader(&mut self, name: impl Into<String>) -> Result<(), InteropError> {
        self.define(name, Accessor::READER)
    }

    pub fn define_writer(&mut self, name: impl Into<String>) -> Result<(), InteropError> {
        self.define(name, Accessor::WRITER)
    }

    pub fn define_accessor(&mut self, name: impl Into<String>) -> Result<(), InteropError> {
        self.define(name, Accessor::BOTH)
    }

    pub fn accessor(&self, name: &str) -> Option<Accessor> {
        self.accessors.get(name).copied()
    }

    pub fn accessor_names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    pub fn internals(&self) -> &InternalAttributes {
        &self.internals
    }

    pub fn set_internal(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<(), InteropError> {
        let name = name.into();
        if self.frozen {
            return Err(frozen_error(name, TargetKind::Attributed));
        }
        self.internals.set(name, value)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn to_display_string(&self) -> String {
        let fields = self.internals.display_fields();
        if fields.is_empty() {
            format!("#<{}>", self.class_name)
        } else {
            format!("#<{} {}>", self.class_name, fields.join(", "))
        }
    }
}

/// A read-only property bag describing another object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaObject {
    properties: IndexMap<String, Value>,
}

impl MetaObject {
    pub fn new<K, I>(properties: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            properties: properties
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn to_display_string(&self) -> String {
        let properties: Vec<String> = self
            .properties
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value.to_display_string()))
            .collect();
        format!("#<meta {}>", properties.join(", "))
    }
}
