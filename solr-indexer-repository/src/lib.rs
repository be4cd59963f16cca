//! # Solr Indexer Repository
//!
//! This crate provides the transport side of the bulk indexer: the
//! `DocumentSink` and `CollectionAdmin` traits the pipeline depends on, the
//! endpoint configuration, and a concrete implementation that talks to Solr
//! over HTTP.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod solr;

pub use config::{SolrConfig, UpdateEndpoint};
pub use errors::SolrError;
pub use interfaces::{CollectionAdmin, DocumentSink};
pub use solr::SolrHttpClient;
