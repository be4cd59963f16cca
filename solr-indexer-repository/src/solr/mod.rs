//! Solr implementation of the sink and admin interfaces.
//!
//! This module provides `SolrHttpClient`, a `reqwest` based client for the
//! XML update handler and the collections API.

mod client;

pub use client::SolrHttpClient;
