//! Document sink trait definition.
//!
//! This module defines the abstract interface the dispatcher uses to
//! deliver serialized payloads to the search engine.

use async_trait::async_trait;

use crate::config::UpdateEndpoint;
use crate::errors::SolrError;
use solr_indexer_shared::Payload;

/// Abstract interface for delivering payloads to an update endpoint.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one sink is shared by every
/// dispatcher worker.
///
/// # Error Handling
///
/// A transport failure or a non-success status is returned as a
/// `SolrError`. Callers decide whether it is fatal; the dispatcher treats it
/// as a per-job failure.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Post one payload to the given endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The collection's update endpoint
    /// * `payload` - The XML body to send
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the endpoint answered with a success status
    /// * `Err(SolrError)` - On transport failure or non-success status
    async fn post(&self, endpoint: &UpdateEndpoint, payload: &Payload) -> Result<(), SolrError>;
}
