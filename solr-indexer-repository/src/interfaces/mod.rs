//! Interface definitions for the Solr transport.
//!
//! The pipeline only depends on these traits, so the HTTP client can be
//! swapped for a mock in tests.

mod collection_admin;
mod document_sink;

pub use collection_admin::CollectionAdmin;
pub use document_sink::DocumentSink;
