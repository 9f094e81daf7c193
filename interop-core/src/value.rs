//! Host runtime values seen at the interop boundary.
//!
//! Entries, properties and internal attributes hold `Value`s, and the
//! `key_info` entry point receives its receiver and key as values.

use crate::key::Key;
use crate::target::Target;

/// Runtime values of the host language
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent value
    Nil,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Symbol, stored without the leading ':'
    Symbol(String),
    /// A foreign object that keys can be queried on
    Object(Box<Target>),
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn object(target: impl Into<Target>) -> Self {
        Value::Object(Box::new(target.into()))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "NilClass",
            Value::Boolean(true) => "TrueClass",
            Value::Boolean(false) => "FalseClass",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Object(target) => target.kind().name(),
        }
    }

    /// The key named by this value, if it is a String or Symbol
    pub fn as_key(&self) -> Option<Key> {
        match self {
            Value::String(name) | Value::Symbol(name) => Some(Key::new(name.as_str())),
            _ => None,
        }
    }

    pub fn as_target(&self) -> Option<&Target> {
        match self {
            Value::Object(target) => Some(target),
            _ => None,
        }
    }

    pub fn as_target_mut(&mut self) -> Option<&mut Target> {
        match self {
            Value::Object(target) => Some(target),
            _ => None,
        }
    }

    /// Convert to display string (inspect-style, strings quoted)
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{:.1}", f)
                } else {
                    f.to_string()
                }
            }
            Value::String(s) => format!("{:?}", s),
            Value::Symbol(name) => format!(":{}", name),
            Value::Object(target) => target.to_display_string(),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::MappingObject;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Nil.type_name(), "NilClass");
        assert_eq!(Value::Integer(42).type_name(), "Integer");
        assert_eq!(Value::Float(4.5).type_name(), "Float");
        assert_eq!(Value::Boolean(true).type_name(), "TrueClass");
        assert_eq!(Value::string("a").type_name(), "String");
        assert_eq!(Value::symbol("a").type_name(), "Symbol");
        assert_eq!(Value::object(MappingObject::new()).type_name(), "Hash");
    }

    #[test]
    fn test_names_convert_to_keys() {
        assert_eq!(Value::string("a").as_key(), Some(Key::new("a")));
        assert_eq!(Value::symbol("@exists").as_key(), Some(Key::new("@exists")));
        assert_eq!(Value::Integer(1).as_key(), None);
        assert_eq!(Value::Nil.as_key(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::string("hi").to_string(), "\"hi\"");
        assert_eq!(Value::symbol("ro").to_string(), ":ro");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Nil.to_string(), "nil");
    }
}
