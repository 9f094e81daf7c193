//! `key_info` for a Hash with String keys

use crate::{classify, CapabilitySet, Key, MappingObject, Target, Value};
use pretty_assertions::assert_eq;

fn hash_fixture() -> Target {
    let mut hash = MappingObject::from_entries([
        ("a", Value::Integer(1)),
        ("b", Value::Integer(2)),
        ("c", Value::Integer(3)),
    ]);
    hash.set_internal("@exists", Value::Integer(14)).unwrap();
    Target::from(hash)
}

fn entry_keys() -> Vec<Key> {
    vec![Key::new("a"), Key::new("b"), Key::new("c")]
}

#[test]
fn test_entries_are_existing_readable_writable() {
    let hash = hash_fixture();
    for key in entry_keys() {
        assert_eq!(
            classify(&hash, &key),
            CapabilitySet::EXISTING | CapabilitySet::READABLE | CapabilitySet::WRITABLE,
            "key {key}"
        );
    }
}

#[test]
fn test_frozen_hash_entries_are_not_writable() {
    let mut hash = hash_fixture();
    hash.freeze();
    for key in entry_keys() {
        assert_eq!(
            classify(&hash, &key),
            CapabilitySet::EXISTING | CapabilitySet::READABLE,
            "key {key}"
        );
    }
}

#[test]
fn test_entries_are_never_invocable_or_internal() {
    let hash = hash_fixture();
    for key in entry_keys() {
        let capabilities = classify(&hash, &key);
        assert!(!capabilities.contains(CapabilitySet::INVOCABLE));
        assert!(!capabilities.contains(CapabilitySet::INTERNAL));
    }
}

#[test]
fn test_missing_key_is_empty() {
    let hash = hash_fixture();
    assert!(classify(&hash, &Key::new("key_not_in_key_info_hash")).is_empty());
}

#[test]
fn test_instance_variable() {
    let hash = hash_fixture();
    assert_eq!(
        classify(&hash, &Key::new("@exists")),
        CapabilitySet::EXISTING
            | CapabilitySet::READABLE
            | CapabilitySet::WRITABLE
            | CapabilitySet::INTERNAL
    );
}

#[test]
fn test_instance_variable_on_frozen_hash() {
    let mut hash = hash_fixture();
    hash.freeze();
    assert_eq!(
        classify(&hash, &Key::new("@exists")),
        CapabilitySet::EXISTING | CapabilitySet::READABLE | CapabilitySet::INTERNAL
    );
}

#[test]
fn test_missing_instance_variable_is_empty() {
    let mut hash = hash_fixture();
    assert!(classify(&hash, &Key::new("@does_not_exist")).is_empty());
    hash.freeze();
    assert!(classify(&hash, &Key::new("@does_not_exist")).is_empty());
}

#[test]
fn test_rendered_as_symbols() {
    let mut hash = hash_fixture();
    assert_eq!(
        classify(&hash, &Key::new("a")).to_string(),
        "[:existing, :readable, :writable]"
    );
    hash.freeze();
    assert_eq!(
        classify(&hash, &Key::new("@exists")).to_string(),
        "[:existing, :readable, :internal]"
    );
    assert_eq!(classify(&hash, &Key::new("missing")).to_string(), "[]");
}
