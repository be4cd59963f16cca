//! Error types for shared data structures.

use thiserror::Error;

/// Errors raised while building a [`FieldSchema`](crate::FieldSchema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The schema has no field names.
    #[error("Field schema must contain at least one field")]
    Empty,

    /// A field name is empty or only whitespace.
    #[error("Field name at position {0} is empty")]
    EmptyName(usize),

    /// The same field name appears more than once.
    #[error("Duplicate field name: {0}")]
    DuplicateName(String),
}

impl SchemaError {
    /// Create a duplicate name error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }
}
