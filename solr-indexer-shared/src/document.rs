//! Ordered document record.

use indexmap::IndexMap;

/// Mapping from field name to value that keeps insertion order.
///
/// Serialization walks the entries in the order they were first inserted,
/// so the same record always produces the same payload. Field names are
/// unique: inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct DocumentRecord {
    fields: IndexMap<String, String>,
}

impl DocumentRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Set `name` to `value`.
    ///
    /// A new name is appended at the end; an existing name keeps its
    /// position and takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Set `name` to `value` and move the entry to the front of the record.
    pub fn insert_first(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.shift_insert(0, name.into(), value.into());
    }

    /// Value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Two records are equal only when their fields match in order.
impl PartialEq for DocumentRecord {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for DocumentRecord {}

impl<K, V> FromIterator<(K, V)> for DocumentRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}
