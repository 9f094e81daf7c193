//! Keys used to query foreign objects.

use std::fmt;

/// Sigil that marks an internal attribute (instance variable) name
pub const INTERNAL_SIGIL: char = '@';

/// Whether a key names ordinary data or implementation-level state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyMode {
    /// An entry, accessor, or property name
    Plain,
    /// An internal attribute name such as `@exists`
    Internal,
}

/// A name looked up on a target.
///
/// The mode is derived from the name itself, so two keys are equal exactly
/// when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    name: String,
}

impl Key {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> KeyMode {
        if is_internal_name(&self.name) {
            KeyMode::Internal
        } else {
            KeyMode::Plain
        }
    }

    pub fn is_internal(&self) -> bool {
        self.mode() == KeyMode::Internal
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Check if a name follows the instance variable convention.
///
/// A single `@` followed by an identifier: `@exists` and `@_x1` qualify,
/// while `@`, `@@class_var` and `@1x` do not.
pub fn is_internal_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix(INTERNAL_SIGIL) else {
        return false;
    };

    let mut chars = rest.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Check if a name can be used for an attribute accessor.
///
/// An accessor `x` is backed by the instance variable `@x`, so the name must
/// be an identifier without the sigil: `rw` qualifies, `@x` and `with-dash`
/// do not.
pub fn is_accessor_name(name: &str) -> bool {
    !name.starts_with(INTERNAL_SIGIL) && is_internal_name(&format!("{INTERNAL_SIGIL}{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_names() {
        assert!(is_internal_name("@exists"));
        assert!(is_internal_name("@_private"));
        assert!(is_internal_name("@x1"));
    }

    #[test]
    fn test_plain_names() {
        assert!(!is_internal_name("exists"));
        assert!(!is_internal_name("@"));
        assert!(!is_internal_name("@@class_var"));
        assert!(!is_internal_name("@1x"));
        assert!(!is_internal_name("@with-dash"));
        assert!(!is_internal_name("a@b"));
        assert!(!is_internal_name(""));
    }

    #[test]
    fn test_accessor_names() {
        assert!(is_accessor_name("rw"));
        assert!(is_accessor_name("_cache2"));
        assert!(!is_accessor_name("@x"));
        assert!(!is_accessor_name("@@x"));
        assert!(!is_accessor_name("with-dash"));
        assert!(!is_accessor_name("1x"));
        assert!(!is_accessor_name(""));
    }

    #[test]
    fn test_key_mode() {
        assert_eq!(Key::new("@exists").mode(), KeyMode::Internal);
        assert_eq!(Key::new("a").mode(), KeyMode::Plain);
        assert!(Key::from("@rw").is_internal());
    }

    #[test]
    fn test_keys_compare_by_name() {
        assert_eq!(Key::new("a"), Key::from("a".to_string()));
        assert_ne!(Key::new("a"), Key::new("A"));
    }
}
