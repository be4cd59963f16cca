//! Solr HTTP client implementation.
//!
//! This module provides the concrete implementation of `DocumentSink` and
//! `CollectionAdmin` on top of `reqwest`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info, instrument};

use crate::config::{SolrConfig, UpdateEndpoint};
use crate::errors::SolrError;
use crate::interfaces::{CollectionAdmin, DocumentSink};
use solr_indexer_shared::Payload;

/// Content type expected by Solr's XML update handler.
const XML_CONTENT_TYPE: &str = "text/xml";

/// Solr client backed by a pooled `reqwest::Client`.
///
/// # Example
///
/// ```ignore
/// let config = SolrConfig::new("http://localhost:8983/solr/", "animals")?;
/// let client = SolrHttpClient::new(config)?;
///
/// let endpoint = client.update_endpoint();
/// client.post(&endpoint, &Payload::new("<add><doc>...</doc></add>")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SolrHttpClient {
    client: reqwest::Client,
    config: SolrConfig,
}

impl SolrHttpClient {
    /// Create a new client for the configured collection.
    ///
    /// # Returns
    ///
    /// * `Ok(SolrHttpClient)` - A new client instance
    /// * `Err(SolrError)` - If the underlying HTTP client cannot be built
    pub fn new(config: SolrConfig) -> Result<Self, SolrError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SolrError::connection(e.to_string()))?;

        info!(
            host = %config.host(),
            collection = %config.collection(),
            timeout_secs = config.request_timeout.as_secs(),
            "Created Solr client"
        );

        Ok(Self { client, config })
    }

    /// The update endpoint of the configured collection.
    pub fn update_endpoint(&self) -> UpdateEndpoint {
        self.config.update_endpoint()
    }

    pub fn config(&self) -> &SolrConfig {
        &self.config
    }
}

#[async_trait]
impl DocumentSink for SolrHttpClient {
    /// Post one XML payload with `Content-Type: text/xml`.
    ///
    /// The response body is only read when the status is not a success, to
    /// include it in the error.
    async fn post(&self, endpoint: &UpdateEndpoint, payload: &Payload) -> Result<(), SolrError> {
        let response = self
            .client
            .post(endpoint.as_str())
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(payload.as_str().to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SolrError::status(status.as_u16(), body));
        }

        debug!(endpoint = %endpoint, bytes = payload.len(), "Payload posted");
        Ok(())
    }
}

#[async_trait]
impl CollectionAdmin for SolrHttpClient {
    #[instrument(skip(self), fields(collection = %self.config.collection()))]
    async fn create_collection(&self, num_shards: u32) -> Result<(), SolrError> {
        let num_shards = num_shards.to_string();
        let response = self
            .client
            .get(self.config.collections_api_url())
            .query(&[
                ("action", "create"),
                ("name", self.config.collection()),
                ("numShards", num_shards.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Create collection request failed");
            return Err(SolrError::status(status.as_u16(), body));
        }

        info!(num_shards = %num_shards, "Collection created");
        Ok(())
    }
}
