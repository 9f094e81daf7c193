//! The key classifier.
//!
//! `classify` maps a (target, key) pair to the capabilities that key has on
//! the target. It is total and only reads the target; an unknown key yields
//! the empty set rather than an error.

use crate::capability::CapabilitySet;
use crate::error::{InteropError, InteropResult};
use crate::key::Key;
use crate::target::{AttributedObject, InternalAttributes, MappingObject, MetaObject, Target};
use crate::value::Value;

/// Compute the capabilities of `key` on `target`
pub fn classify(target: &Target, key: &Key) -> CapabilitySet {
    let capabilities = match target {
        Target::Mapping(mapping) => classify_mapping(mapping, key),
        Target::Attributed(object) => classify_attributed(object, key),
        Target::Meta(meta) => classify_meta(meta, key),
    };

    tracing::trace!(
        target_kind = target.kind().name(),
        key = key.name(),
        %capabilities,
        "classified key"
    );

    capabilities
}

/// Interop entry point: classify a key given as a host value.
///
/// Fails when the receiver is not an object or the key is not a name, so
/// that misuse is not mistaken for an absent key.
pub fn key_info(receiver: &Value, key: &Value) -> InteropResult<CapabilitySet> {
    let target = receiver
        .as_target()
        .ok_or_else(|| InteropError::unsupported_receiver(receiver.type_name()))?;
    let key = key
        .as_key()
        .ok_or_else(|| InteropError::invalid_key(key.type_name()))?;

    Ok(classify(target, &key))
}

/// Internal attributes: readable and internal, writable until frozen, never invocable.
fn classify_internal(
    internals: &InternalAttributes,
    key: &Key,
    frozen: bool,
) -> Option<CapabilitySet> {
    if key.is_internal() && internals.contains(key.name()) {
        Some(
            (CapabilitySet::EXISTING | CapabilitySet::READABLE | CapabilitySet::INTERNAL)
                .with_writable_unless(frozen),
        )
    } else {
        None
    }
}

fn classify_mapping(mapping: &MappingObject, key: &Key) -> CapabilitySet {
    let frozen = mapping.is_frozen();

    if let Some(capabilities) = classify_internal(mapping.internals(), key, frozen) {
        return capabilities;
    }

    if mapping.contains_entry(key.name()) {
        return (CapabilitySet::EXISTING | CapabilitySet::READABLE).with_writable_unless(frozen);
    }

    CapabilitySet::empty()
}

fn classify_attributed(object: &AttributedObject, key: &Key) -> CapabilitySet {
    let frozen = object.is_frozen();

    if let Some(capabilities) = classify_internal(object.internals(), key, frozen) {
        return capabilities;
    }

    let Some(accessor) = object.accessor(key.name()) else {
        return CapabilitySet::empty();
    };

    let mut capabilities = CapabilitySet::EXISTING;
    if accessor.reader {
        capabilities |= CapabilitySet::READABLE;
    }
    if accessor.writer && !frozen {
        capabilities |= CapabilitySet::WRITABLE;
    }
    capabilities
}

// Meta objects are read-only descriptions; nothing on them is ever writable.
fn classify_meta(meta: &MetaObject, key: &Key) -> CapabilitySet {
    if meta.property(key.name()).is_some() {
        CapabilitySet::EXISTING | CapabilitySet::READABLE
    } else {
        CapabilitySet::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Accessor;

    #[test]
    fn test_internal_check_runs_before_entries() {
        // Entry names may contain the sigil when inserted directly; the
        // internal attribute still wins.
        let mut mapping = MappingObject::new();
        mapping.insert("@x", Value::Integer(1)).unwrap();
        mapping.set_internal("@x", Value::Integer(2)).unwrap();

        let capabilities = classify(&Target::from(mapping), &Key::new("@x"));
        assert!(capabilities.contains(CapabilitySet::INTERNAL));
    }

    #[test]
    fn test_internal_name_without_attribute_falls_back_to_entries() {
        let mut mapping = MappingObject::new();
        mapping.insert("@x", Value::Integer(1)).unwrap();

        let capabilities = classify(&Target::from(mapping), &Key::new("@x"));
        assert_eq!(
            capabilities,
            CapabilitySet::EXISTING | CapabilitySet::READABLE | CapabilitySet::WRITABLE
        );
    }

    #[test]
    fn test_accessor_without_halves_still_exists() {
        let object = AttributedObject::with_accessors("Empty", [("ghost", Accessor::default())]).unwrap();
        assert_eq!(
            classify(&Target::from(object), &Key::new("ghost")),
            CapabilitySet::EXISTING
        );
    }

    #[test]
    fn test_meta_properties_are_read_only() {
        let meta = MetaObject::new([("name", Value::string("Hash"))]);
        let target = Target::from(meta);
        assert_eq!(
            classify(&target, &Key::new("name")),
            CapabilitySet::EXISTING | CapabilitySet::READABLE
        );
        assert!(classify(&target, &Key::new("simple_name")).is_empty());
    }

    #[test]
    fn test_key_info_rejects_non_objects() {
        assert_eq!(
            key_info(&Value::Integer(1), &Value::string("a")),
            Err(InteropError::unsupported_receiver("Integer"))
        );
    }

    #[test]
    fn test_key_info_rejects_non_name_keys() {
        let receiver = Value::object(MappingObject::new());
        assert_eq!(
            key_info(&receiver, &Value::Integer(1)),
            Err(InteropError::invalid_key("Integer"))
        );
    }

    #[test]
    fn test_key_info_accepts_strings_and_symbols() {
        let receiver = Value::object(MappingObject::from_entries([("a", Value::Integer(1))]));
        let by_string = key_info(&receiver, &Value::string("a")).unwrap();
        let by_symbol = key_info(&receiver, &Value::symbol("a")).unwrap();
        assert_eq!(by_string, by_symbol);
        assert!(by_string.contains(CapabilitySet::EXISTING));
    }
}
