//! Error types for the Solr indexer repository.

mod solr_error;

pub use solr_error::SolrError;
