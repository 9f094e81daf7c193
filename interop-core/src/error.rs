//! Errors raised at the interop boundary.
//!
//! Classification itself never fails; these cover caller-contract violations
//! and the read/write messages.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum InteropError {
    #[error("Unsupported receiver: {type_name} does not expose keys")]
    #[diagnostic(
        code(interop::unsupported_receiver),
        help("Only Hash-like, attributed and meta objects can be queried for keys")
    )]
    UnsupportedReceiver { type_name: String },

    #[error("Invalid key: expected a String or Symbol, found {type_name}")]
    #[diagnostic(
        code(interop::invalid_key),
        help("Keys are names; pass a String or a Symbol")
    )]
    InvalidKey { type_name: String },

    #[error("Invalid internal attribute name: {name}")]
    #[diagnostic(
        code(interop::invalid_internal_name),
        help("Internal attribute names are a single '@' followed by an identifier, like @exists")
    )]
    InvalidInternalName { name: String },

    #[error("Invalid accessor name: {name}")]
    #[diagnostic(
        code(interop::invalid_accessor_name),
        help("Accessor names are identifiers without the '@' sigil, like ro or rw")
    )]
    InvalidAccessorName { name: String },

    #[error("Unknown identifier: {key}")]
    #[diagnostic(code(interop::unknown_identifier))]
    UnknownIdentifier { key: String },

    #[error("Key {key} is not readable")]
    #[diagnostic(
        code(interop::not_readable),
        help("The name has a writer but no reader")
    )]
    NotReadable { key: String },

    #[error("Key {key} is not writable")]
    #[diagnostic(code(interop::not_writable))]
    NotWritable { key: String },

    #[error("Can't modify frozen {target}: cannot write {key}")]
    #[diagnostic(
        code(interop::frozen_target),
        help("Frozen objects keep their readable keys but reject every write")
    )]
    FrozenTarget { key: String, target: String },
}

impl InteropError {
    pub fn unsupported_receiver(type_name: &str) -> Self {
        Self::UnsupportedReceiver {
            type_name: type_name.to_string(),
        }
    }

    pub fn invalid_key(type_name: &str) -> Self {
        Self::InvalidKey {
            type_name: type_name.to_string(),
        }
    }

    pub fn unknown_identifier(key: &str) -> Self {
        Self::UnknownIdentifier {
            key: key.to_string(),
        }
    }
}

pub type InteropResult<T> = Result<T, InteropError>;
