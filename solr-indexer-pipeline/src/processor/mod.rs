//! Processor module for the bulk indexing pipeline.
//!
//! Transforms raw rows into update payloads: clean, encode, serialize.

mod cleaner;
mod encoder;
mod row_processor;
mod serializer;

pub use cleaner::clean;
pub use encoder::{DocumentEncoder, ROW_SEPARATOR};
pub use row_processor::RowProcessor;
pub use serializer::{EscapeMode, XmlSerializer};
