//! The KEYS, READ and WRITE interop messages.
//!
//! Each message agrees with `classify`: `keys` lists exactly the existing
//! keys, `read` succeeds iff the key is readable and `write` iff it is
//! writable.

use crate::capability::CapabilitySet;
use crate::classify::classify;
use crate::error::{InteropError, InteropResult};
use crate::key::{Key, INTERNAL_SIGIL};
use crate::target::Target;
use crate::value::Value;

/// List the keys of a target.
///
/// Entry, accessor or property names come first in their defined order,
/// followed by internal attribute names when `include_internal` is set.
/// Each name is listed once.
pub fn keys(target: &Target, include_internal: bool) -> Vec<Key> {
    let mut keys: Vec<Key> = match target {
        Target::Mapping(mapping) => mapping.entry_names().map(Key::from).collect(),
        Target::Attributed(object) => object.accessor_names().map(Key::from).collect(),
        Target::Meta(meta) => meta.property_names().map(Key::from).collect(),
    };

    if include_internal {
        if let Some(internals) = target.internals() {
            for name in internals.names() {
                // A Hash entry may already be spelled like the attribute
                if !keys.iter().any(|key| key.name() == name) {
                    keys.push(Key::from(name));
                }
            }
        }
    }

    keys
}

/// Name of the instance variable backing an accessor
fn backing_attribute(accessor: &str) -> String {
    format!("{INTERNAL_SIGIL}{accessor}")
}

/// Read the value of a key
pub fn read(target: &Target, key: &Key) -> InteropResult<Value> {
    let capabilities = classify(target, key);
    if capabilities.is_empty() {
        return Err(InteropError::unknown_identifier(key.name()));
    }
    if !capabilities.contains(CapabilitySet::READABLE) {
        return Err(InteropError::NotReadable {
            key: key.name().to_string(),
        });
    }

    let value = if capabilities.contains(CapabilitySet::INTERNAL) {
        target
            .internals()
            .and_then(|internals| internals.get(key.name()))
            .cloned()
    } else {
        match target {
            Target::Mapping(mapping) => mapping.entry(key.name()).cloned(),
            // attr_reader answers nil until the backing variable is set
            Target::Attributed(object) => Some(
                object
                    .internals()
                    .get(&backing_attribute(key.name()))
                    .cloned()
                    .unwrap_or(Value::Nil),
            ),
            Target::Meta(meta) => meta.property(key.name()).cloned(),
        }
    };

    value.ok_or_else(|| InteropError::unknown_identifier(key.name()))
}

/// Write the value of a key
pub fn write(target: &mut Target, key: &Key, value: Value) -> InteropResult<()> {
    let capabilities = classify(target, key);
    if capabilities.is_empty() {
        return Err(InteropError::unknown_identifier(key.name()));
    }
    if !capabilities.contains(CapabilitySet::WRITABLE) {
        return Err(if target.is_frozen() {
            InteropError::FrozenTarget {
                key: key.name().to_string(),
                target: target.kind().name().to_string(),
            }
        } else {
            InteropError::NotWritable {
                key: key.name().to_string(),
            }
        });
    }

    if capabilities.contains(CapabilitySet::INTERNAL) {
        return target.set_internal(key.name(), value);
    }

    match target {
        Target::Mapping(mapping) => mapping.insert(key.name(), value),
        Target::Attributed(object) => object.set_internal(backing_attribute(key.name()), value),
        Target::Meta(_) => Err(InteropError::NotWritable {
            key: key.name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{AttributedObject, MappingObject, MetaObject};
    use pretty_assertions::assert_eq;

    fn fixture_object() -> Target {
        let mut object = AttributedObject::new("KeyInfoFixture");
        object.define_reader("ro").unwrap();
        object.define_accessor("rw").unwrap();
        object.define_writer("wo").unwrap();
        object.set_internal("@exists", Value::Integer(14)).unwrap();
        Target::from(object)
    }

    #[test]
    fn test_keys_for_mapping() {
        let mut mapping = MappingObject::from_entries([
            ("a", Value::Integer(1)),
            ("b", Value::Integer(2)),
        ]);
        mapping.set_internal("@exists", Value::Integer(14)).unwrap();
        let target = Target::from(mapping);

        assert_eq!(keys(&target, false), vec![Key::new("a"), Key::new("b")]);
        assert_eq!(
            keys(&target, true),
            vec![Key::new("a"), Key::new("b"), Key::new("@exists")]
        );
    }

    #[test]
    fn test_keys_list_a_shared_name_once() {
        let mut mapping = MappingObject::from_entries([("@x", Value::Integer(1))]);
        mapping.set_internal("@x", Value::Integer(2)).unwrap();
        let target = Target::from(mapping);

        assert_eq!(keys(&target, false), vec![Key::new("@x")]);
        assert_eq!(keys(&target, true), vec![Key::new("@x")]);
    }

    #[test]
    fn test_keys_for_object_follow_definition_order() {
        let target = fixture_object();
        assert_eq!(
            keys(&target, true),
            vec![
                Key::new("ro"),
                Key::new("rw"),
                Key::new("wo"),
                Key::new("@exists")
            ]
        );
    }

    #[test]
    fn test_read_accessors_through_backing_attribute() {
        let mut target = fixture_object();
        assert_eq!(read(&target, &Key::new("rw")), Ok(Value::Nil));

        write(&mut target, &Key::new("rw"), Value::Integer(7)).unwrap();
        assert_eq!(read(&target, &Key::new("rw")), Ok(Value::Integer(7)));
        assert_eq!(read(&target, &Key::new("@rw")), Ok(Value::Integer(7)));
    }

    #[test]
    fn test_write_only_accessor_is_not_readable() {
        let target = fixture_object();
        assert_eq!(
            read(&target, &Key::new("wo")),
            Err(InteropError::NotReadable {
                key: "wo".to_string()
            })
        );
    }

    #[test]
    fn test_read_unknown_key() {
        let target = fixture_object();
        assert_eq!(
            read(&target, &Key::new("missing")),
            Err(InteropError::unknown_identifier("missing"))
        );
    }

    #[test]
    fn test_write_read_only_accessor() {
        let mut target = fixture_object();
        assert_eq!(
            write(&mut target, &Key::new("ro"), Value::Nil),
            Err(InteropError::NotWritable {
                key: "ro".to_string()
            })
        );
    }

    #[test]
    fn test_write_frozen_target() {
        let mut target = fixture_object();
        target.freeze();
        assert_eq!(
            write(&mut target, &Key::new("@exists"), Value::Integer(15)),
            Err(InteropError::FrozenTarget {
                key: "@exists".to_string(),
                target: "Object".to_string()
            })
        );
        assert_eq!(read(&target, &Key::new("@exists")), Ok(Value::Integer(14)));
    }

    #[test]
    fn test_write_mapping_entry() {
        let mut target = Target::from(MappingObject::from_entries([("a", Value::Integer(1))]));
        write(&mut target, &Key::new("a"), Value::Integer(10)).unwrap();
        assert_eq!(read(&target, &Key::new("a")), Ok(Value::Integer(10)));

        // Writes never insert new entries.
        assert_eq!(
            write(&mut target, &Key::new("z"), Value::Nil),
            Err(InteropError::unknown_identifier("z"))
        );
    }

    #[test]
    fn test_meta_object_messages() {
        let mut target = Target::from(MetaObject::new([("name", Value::string("Hash"))]));
        assert_eq!(keys(&target, true), vec![Key::new("name")]);
        assert_eq!(read(&target, &Key::new("name")), Ok(Value::string("Hash")));
        assert!(matches!(
            write(&mut target, &Key::new("name"), Value::Nil),
            Err(InteropError::NotWritable { .. })
        ));
    }
}
