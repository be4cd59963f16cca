//! Field schema used to interpret positional row values.

use std::collections::HashSet;

use crate::errors::SchemaError;

/// Name of the generated unique identifier field.
pub const ID_FIELD: &str = "id";

/// Name of the synthetic field that keeps the original row text.
pub const ROW_FIELD: &str = "row";

/// Ordered list of field names, fixed for one indexing run.
///
/// The value at position `i` of a row is stored under the name at position
/// `i` of the schema. Names are unique and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    names: Vec<String>,
}

impl FieldSchema {
    /// Build a schema from an ordered list of field names.
    ///
    /// # Errors
    ///
    /// * `SchemaError::Empty` - if no names are given
    /// * `SchemaError::EmptyName` - if a name is blank
    /// * `SchemaError::DuplicateName` - if a name is repeated
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::EmptyName(position));
            }
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::duplicate(name.as_str()));
            }
        }

        Ok(Self { names })
    }

    /// Return a copy of this schema with `name` appended as the final slot.
    pub fn with_field(&self, name: &str) -> Result<Self, SchemaError> {
        if self.contains(name) {
            return Err(SchemaError::duplicate(name));
        }
        let mut names = self.names.clone();
        names.push(name.to_string());
        Ok(Self { names })
    }

    /// Number of fields in the schema.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed schema; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the schema defines a field with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Field name at the given position.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    /// Iterate over field names in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
