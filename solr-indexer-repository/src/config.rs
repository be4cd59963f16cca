//! Configuration types for the Solr client.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::errors::SolrError;

/// Default request timeout for Solr calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Solr client.
#[derive(Debug, Clone)]
pub struct SolrConfig {
    /// Base URL of the Solr web app, always ending in `/`
    /// (e.g. `http://localhost:8983/solr/`).
    host: String,
    /// Name of the target collection.
    collection: String,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl SolrConfig {
    /// Create a config for `collection` on the Solr instance at `host`.
    ///
    /// A missing trailing `/` on the host is added.
    ///
    /// # Errors
    ///
    /// * `SolrError::InvalidUrl` - if `host` does not parse as a URL
    /// * `SolrError::InvalidConfig` - if `collection` is empty or contains `/`
    pub fn new(host: &str, collection: impl Into<String>) -> Result<Self, SolrError> {
        let parsed = Url::parse(host).map_err(|e| SolrError::invalid_url(format!("{host}: {e}")))?;

        let mut host = parsed.to_string();
        if !host.ends_with('/') {
            host.push('/');
        }

        let collection = collection.into();
        if collection.trim().is_empty() {
            return Err(SolrError::invalid_config("collection name is required"));
        }
        if collection.contains('/') {
            return Err(SolrError::invalid_config(format!(
                "collection name must not contain '/': {collection}"
            )));
        }

        Ok(Self {
            host,
            collection,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Set a custom request timeout.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The collection's XML update endpoint: `{host}{collection}/update/`.
    pub fn update_endpoint(&self) -> UpdateEndpoint {
        UpdateEndpoint {
            url: format!("{}{}/update/", self.host, self.collection),
        }
    }

    /// The collections API endpoint: `{host}admin/collections`.
    pub fn collections_api_url(&self) -> String {
        format!("{}admin/collections", self.host)
    }
}

/// Destination of every dispatch job in one indexing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEndpoint {
    url: String,
}

impl UpdateEndpoint {
    /// Wrap an already composed update URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for UpdateEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
