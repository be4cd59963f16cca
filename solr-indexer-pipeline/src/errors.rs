//! Error types for the bulk indexing pipeline.

use std::path::Path;

use solr_indexer_shared::SchemaError;
use thiserror::Error;

/// Errors that can end an indexing run.
///
/// Per-job transport failures are not represented here: the dispatcher
/// logs and counts them without failing the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The index request is incomplete or inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The source file could not be opened or read.
    #[error("Source error for {path}: {message}")]
    SourceError { path: String, message: String },

    /// A job could not be handed to the dispatcher.
    #[error("Dispatch error: {0}")]
    DispatchError(String),

    /// The producer thread panicked or was cancelled by the runtime.
    #[error("Producer error: {0}")]
    ProducerError(String),
}

impl PipelineError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a source error for the given path.
    pub fn unreadable(path: &Path, msg: impl ToString) -> Self {
        Self::SourceError {
            path: path.display().to_string(),
            message: msg.to_string(),
        }
    }

    /// Create a dispatch error.
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::DispatchError(msg.into())
    }

    /// Create a producer error.
    pub fn producer(msg: impl Into<String>) -> Self {
        Self::ProducerError(msg.into())
    }
}

impl From<SchemaError> for PipelineError {
    fn from(err: SchemaError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
