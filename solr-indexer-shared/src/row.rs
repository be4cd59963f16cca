//! Raw row read from a delimited source.

/// Ordered raw values of one record.
///
/// A row is produced once by the source and consumed once by the
/// processing stages; it is not meant to be shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Create a row from its values.
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Values in source order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Take ownership of the values.
    pub fn into_values(self) -> Vec<String> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<String>> for Row {
    fn from(values: Vec<String>) -> Self {
        Self::new(values)
    }
}

impl<'a> From<Vec<&'a str>> for Row {
    fn from(values: Vec<&'a str>) -> Self {
        Self::new(values.into_iter().map(str::to_string).collect())
    }
}
