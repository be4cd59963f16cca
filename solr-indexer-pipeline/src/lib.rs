//! # Solr Indexer Pipeline
//!
//! This crate provides the bulk indexing pipeline: it streams rows from a
//! delimited file, turns each row into an XML update payload and posts the
//! payloads concurrently to Solr.
//!
//! ## Architecture
//!
//! The pipeline follows the Source-Processor-Dispatcher pattern:
//!
//! 1. **Source**: Reads rows lazily from a delimited file (or a whole XML file)
//! 2. **Processor**: Cleans, encodes and serializes each row into a payload
//! 3. **Dispatcher**: Posts payloads through a bounded worker pool
//! 4. **Orchestrator**: Validates the request and coordinates the run

pub mod dispatcher;
pub mod errors;
pub mod orchestrator;
pub mod processor;
pub mod source;

pub use dispatcher::{DispatchJob, DispatchSummary, Dispatcher, DispatcherConfig, JobSubmitter};
pub use errors::PipelineError;
pub use orchestrator::{FileFormat, IndexReport, IndexRequest, Indexer};
pub use processor::{DocumentEncoder, EscapeMode, RowProcessor, XmlSerializer};
pub use source::{Delimiter, RowSource};
