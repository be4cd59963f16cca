//! Serialized update payload.

use std::fmt;

/// Immutable XML body posted to the update endpoint.
///
/// Created once per document (or once per file in single-document mode),
/// handed to the dispatcher and dropped after the post completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    body: String,
}

impl Payload {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    /// Length of the body in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}
