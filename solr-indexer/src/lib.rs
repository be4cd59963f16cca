//! # Solr Indexer
//!
//! Main library for the Solr bulk indexer.
//!
//! This crate reads the run configuration from the environment and wires
//! the Solr client into the indexing pipeline.

pub mod config;

pub use config::{Dependencies, IndexerSettings};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] solr_indexer_pipeline::PipelineError),

    /// Solr error.
    #[error("Solr error: {0}")]
    SolrError(#[from] solr_indexer_repository::SolrError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
