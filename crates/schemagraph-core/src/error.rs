//! Error types for schema synthesis

use crate::position::Position;
use std::fmt;
use thiserror::Error;

/// Result type alias for resolution operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Container a union type was found nested in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Array,
    Map,
    InlineStruct,
}

impl fmt::Display for Nesting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nesting::Array => write!(f, "an array"),
            Nesting::Map => write!(f, "a map"),
            Nesting::InlineStruct => write!(f, "an inline struct"),
        }
    }
}

/// Build-time diagnostics raised while resolving a type graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A type references itself, directly or transitively
    #[error("{position}: cyclic type `{type_name}` ({chain})")]
    CyclicType {
        type_name: String,
        chain: String,
        position: Position,
    },

    /// Nesting exceeded the configured ceiling
    #[error("{position}: maximum nesting depth {limit} exceeded while resolving `{root}`")]
    MaxDepthExceeded {
        root: String,
        limit: usize,
        position: Position,
    },

    /// A referenced type has no declaration
    #[error("{position}: unresolved type `{type_name}`")]
    UnresolvedType { type_name: String, position: Position },

    /// A map, channel, function, or unregistered interface where a schema type is required
    #[error("{position}: unsupported type: {detail}")]
    UnsupportedType { detail: String, position: Position },

    /// Two fields resolve to the same wire name
    #[error("{position}: duplicate JSON name `{name}` in `{owner}` (first declared at {first})")]
    DuplicateJsonName {
        name: String,
        owner: String,
        first: Position,
        position: Position,
    },

    /// A union type nested inside a container instead of a direct field
    #[error("{position}: union `{union}` may only be used as a direct field, found inside {container}")]
    IllegalUnionPlacement {
        union: String,
        container: Nesting,
        position: Position,
    },

    /// A union option that does not resolve to an object
    #[error("{position}: option `{option}` of union `{union}` resolves to {found}, expected an object")]
    NonObjectUnionOption {
        union: String,
        option: String,
        found: &'static str,
        position: Position,
    },

    /// An enumeration constant without a usable literal value
    #[error("{position}: constant `{constant}` of enum `{type_name}` has no literal value")]
    NonLiteralEnum {
        type_name: String,
        constant: String,
        position: Position,
    },
}

impl SchemaError {
    /// Stable numeric code for diagnostics
    pub fn error_code(&self) -> u32 {
        match self {
            SchemaError::CyclicType { .. } => 101,
            SchemaError::MaxDepthExceeded { .. } => 102,
            SchemaError::UnresolvedType { .. } => 103,
            SchemaError::UnsupportedType { .. } => 201,
            SchemaError::DuplicateJsonName { .. } => 202,
            SchemaError::IllegalUnionPlacement { .. } => 203,
            SchemaError::NonObjectUnionOption { .. } => 301,
            SchemaError::NonLiteralEnum { .. } => 302,
        }
    }

    /// Source position the diagnostic points at
    pub fn position(&self) -> &Position {
        match self {
            SchemaError::CyclicType { position, .. }
            | SchemaError::MaxDepthExceeded { position, .. }
            | SchemaError::UnresolvedType { position, .. }
            | SchemaError::UnsupportedType { position, .. }
            | SchemaError::DuplicateJsonName { position, .. }
            | SchemaError::IllegalUnionPlacement { position, .. }
            | SchemaError::NonObjectUnionOption { position, .. }
            | SchemaError::NonLiteralEnum { position, .. } => position,
        }
    }
}
