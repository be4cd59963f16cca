//! Solr error types.
//!
//! This module defines the errors that can occur while talking to Solr.

use thiserror::Error;

/// Errors that can occur during Solr operations.
#[derive(Debug, Clone, Error)]
pub enum SolrError {
    /// Failed to establish a connection to Solr.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Solr answered with a non-success status code.
    #[error("Solr returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The configured host is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Client configuration is invalid (e.g., empty collection name).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Any other failure while building or sending a request.
    #[error("Request error: {0}")]
    RequestError(String),
}

impl SolrError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid URL error.
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::RequestError(msg.into())
    }
}

impl From<reqwest::Error> for SolrError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionError(err.to_string())
        } else {
            Self::RequestError(err.to_string())
        }
    }
}
