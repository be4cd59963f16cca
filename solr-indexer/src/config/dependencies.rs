//! Dependency initialization and wiring for the Solr indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::IndexerSettings;
use crate::IndexingError;
use solr_indexer_pipeline::{IndexRequest, Indexer};
use solr_indexer_repository::{CollectionAdmin, SolrConfig, SolrHttpClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured indexer, shared with the signal handler.
    pub indexer: Arc<Indexer>,
    /// The request to run.
    pub request: IndexRequest,
}

impl Dependencies {
    /// Build the Solr client and indexer, creating the collection first when
    /// `create_shards` is set.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the client cannot be built or the
    ///   collection cannot be created
    pub async fn new(settings: IndexerSettings) -> Result<Self, IndexingError> {
        info!(
            solr_host = %settings.solr_host,
            collection = %settings.solr_collection,
            pool_size = settings.dispatcher.pool_size,
            "Initializing dependencies"
        );

        let config = SolrConfig::new(&settings.solr_host, settings.solr_collection.as_str())?
            .with_request_timeout(settings.request_timeout);
        let client = SolrHttpClient::new(config)?;

        if let Some(num_shards) = settings.create_shards {
            client.create_collection(num_shards).await?;
        }

        let endpoint = client.update_endpoint();
        let indexer = Indexer::with_config(Arc::new(client), endpoint, settings.dispatcher);

        Ok(Self {
            indexer: Arc::new(indexer),
            request: settings.request,
        })
    }
}
