//! Document encoder.
//!
//! Maps cleaned row values onto the field schema and adds the synthetic
//! `id` and `row` fields.

use uuid::Uuid;

use crate::errors::PipelineError;
use solr_indexer_shared::{DocumentRecord, FieldSchema, Row, ID_FIELD, ROW_FIELD};

/// Separator used when joining a row's values into the `row` field.
pub const ROW_SEPARATOR: &str = "|";

/// Encoder that turns cleaned rows into document records.
///
/// The encoder is responsible for:
/// - Mapping value `i` to field `i`, dropping values beyond the schema
/// - Keeping the pipe-joined row under `row` when `keep_row` is set
/// - Injecting a fresh UUIDv4 under `id` when `unique_id` is set
#[derive(Debug, Clone)]
pub struct DocumentEncoder {
    schema: FieldSchema,
    effective_schema: FieldSchema,
    unique_id: bool,
    keep_row: bool,
}

impl DocumentEncoder {
    /// Create an encoder for the given schema.
    ///
    /// # Errors
    ///
    /// * `PipelineError::ConfigError` - if `keep_row` is set and the schema
    ///   already defines a `row` field
    pub fn new(schema: FieldSchema, unique_id: bool, keep_row: bool) -> Result<Self, PipelineError> {
        let effective_schema = if keep_row {
            schema.with_field(ROW_FIELD)?
        } else {
            schema.clone()
        };

        Ok(Self {
            schema,
            effective_schema,
            unique_id,
            keep_row,
        })
    }

    /// Schema used for positional mapping, including `row` when it is kept.
    pub fn effective_schema(&self) -> &FieldSchema {
        &self.effective_schema
    }

    /// Encode one cleaned row.
    ///
    /// Positional fields are written first. The `row` field always takes the
    /// final slot of the effective schema. A generated `id` wins over a
    /// positional `id` and is placed first in the record.
    pub fn encode(&self, row: Row) -> DocumentRecord {
        let values = row.into_values();
        let joined = self.keep_row.then(|| values.join(ROW_SEPARATOR));

        let mut record = DocumentRecord::with_capacity(self.effective_schema.len() + 1);
        for (name, value) in self.schema.iter().zip(values) {
            record.insert(name, value);
        }

        if let Some(joined) = joined {
            record.insert(ROW_FIELD, joined);
        }

        if self.unique_id {
            record.insert_first(ID_FIELD, Uuid::new_v4().to_string());
        }

        record
    }
}
