//! # Solr Indexer Shared
//!
//! Shared types used across the Solr bulk indexer crates: the field schema
//! that interprets positional rows, the raw row itself, the ordered document
//! record built from it, and the serialized payload sent to the update
//! endpoint.

mod document;
mod errors;
mod payload;
mod row;
mod schema;

pub use document::DocumentRecord;
pub use errors::SchemaError;
pub use payload::Payload;
pub use row::Row;
pub use schema::{FieldSchema, ID_FIELD, ROW_FIELD};
