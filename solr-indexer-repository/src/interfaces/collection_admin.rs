//! Collection administration trait definition.

use async_trait::async_trait;

use crate::errors::SolrError;

/// Administrative operations on the configured collection.
#[async_trait]
pub trait CollectionAdmin: Send + Sync {
    /// Create the collection with the given number of shards.
    ///
    /// The collection's configuration set must already be uploaded to the
    /// cluster's configuration store.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If Solr accepted the request
    /// * `Err(SolrError)` - On transport failure or non-success status
    async fn create_collection(&self, num_shards: u32) -> Result<(), SolrError>;
}
