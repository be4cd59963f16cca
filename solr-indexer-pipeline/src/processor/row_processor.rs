//! Row processor: the clean → encode → serialize chain.

use crate::errors::PipelineError;
use crate::processor::{clean, DocumentEncoder, XmlSerializer};
use solr_indexer_shared::{Payload, Row};

/// Processor that turns raw rows into update payloads.
///
/// Each stage is a pure in-memory transform, so one row is held at a time.
#[derive(Debug, Clone)]
pub struct RowProcessor {
    encoder: DocumentEncoder,
    serializer: XmlSerializer,
}

impl RowProcessor {
    /// Create a new row processor.
    pub fn new(encoder: DocumentEncoder, serializer: XmlSerializer) -> Self {
        Self {
            encoder,
            serializer,
        }
    }

    /// Process a single raw row.
    pub fn process(&self, row: Row) -> Payload {
        let record = self.encoder.encode(clean(row));
        self.serializer.serialize(&record)
    }

    /// Lazily map a row stream to a payload stream.
    ///
    /// Source errors are passed through unchanged.
    pub fn payloads<'a, I>(&'a self, rows: I) -> impl Iterator<Item = Result<Payload, PipelineError>> + 'a
    where
        I: IntoIterator<Item = Result<Row, PipelineError>>,
        I::IntoIter: 'a,
    {
        rows.into_iter().map(move |row| row.map(|row| self.process(row)))
    }
}
