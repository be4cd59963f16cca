//! Orchestrator module for the bulk indexing pipeline.
//!
//! Coordinates the source, processor and dispatcher for one indexing run.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{error, info, instrument, warn};

use crate::dispatcher::{DispatchSummary, Dispatcher, DispatcherConfig, JobSubmitter};
use crate::errors::PipelineError;
use crate::processor::{DocumentEncoder, EscapeMode, RowProcessor, XmlSerializer};
use crate::source::{read_xml_document, Delimiter, RowSource};
use solr_indexer_repository::{DocumentSink, UpdateEndpoint};
use solr_indexer_shared::FieldSchema;

/// Layout of the input file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// A ready-made Solr XML update document, posted as one payload.
    #[default]
    SolrXml,
    /// Delimited text, one document per row.
    Delimited,
}

impl FromStr for FileFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solrxml" | "xml" => Ok(Self::SolrXml),
            "csv" | "delimited" => Ok(Self::Delimited),
            other => Err(PipelineError::config(format!(
                "unknown file format {other:?}, expected \"solrxml\" or \"csv\""
            ))),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SolrXml => f.write_str("solrxml"),
            Self::Delimited => f.write_str("csv"),
        }
    }
}

/// Everything needed for one indexing run.
#[derive(Debug, Clone)]
pub struct IndexRequest {
    pub file_path: PathBuf,
    pub file_format: FileFormat,
    /// Required for delimited input.
    pub delimiter: Option<Delimiter>,
    /// Field names in column order. Required for delimited input.
    pub fields: Vec<String>,
    /// Inject a fresh UUIDv4 under `id` in every document.
    pub unique_id: bool,
    /// Keep the pipe-joined row under `row` in every document.
    pub keep_row: bool,
    pub escape: EscapeMode,
}

impl IndexRequest {
    /// Request for a pre-built Solr XML file.
    pub fn solr_xml(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            file_format: FileFormat::SolrXml,
            delimiter: None,
            fields: Vec::new(),
            unique_id: true,
            keep_row: false,
            escape: EscapeMode::Raw,
        }
    }

    /// Request for a delimited file mapped onto `fields` by position.
    pub fn delimited<I, S>(file_path: impl Into<PathBuf>, delimiter: Delimiter, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            file_format: FileFormat::Delimited,
            delimiter: Some(delimiter),
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::solr_xml(file_path)
        }
    }

    pub fn with_unique_id(mut self, unique_id: bool) -> Self {
        self.unique_id = unique_id;
        self
    }

    pub fn with_keep_row(mut self, keep_row: bool) -> Self {
        self.keep_row = keep_row;
        self
    }

    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    /// Build the row processor for a delimited request.
    ///
    /// # Errors
    ///
    /// * `PipelineError::ConfigError` - if the delimiter or fields are
    ///   missing or the field names are invalid
    fn row_processor(&self) -> Result<(Delimiter, RowProcessor), PipelineError> {
        let delimiter = self
            .delimiter
            .ok_or_else(|| PipelineError::config("delimited input requires a delimiter"))?;
        if self.fields.is_empty() {
            return Err(PipelineError::config("delimited input requires field names"));
        }

        let schema = FieldSchema::new(&self.fields)?;
        let encoder = DocumentEncoder::new(schema, self.unique_id, self.keep_row)?;
        Ok((delimiter, RowProcessor::new(encoder, XmlSerializer::new(self.escape))))
    }
}

/// Result of one indexing run.
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub file_format: FileFormat,
    /// Rows turned into jobs. Zero for Solr XML input.
    pub rows_read: usize,
    pub summary: DispatchSummary,
    /// Whether the run stopped early on a shutdown signal.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ProducerOutcome {
    rows_read: usize,
    cancelled: bool,
}

/// Indexer that runs files through the pipeline into one Solr collection.
///
/// The indexer:
/// - Validates each request before touching the network
/// - Streams rows on a blocking thread while workers post concurrently
/// - Waits for every submitted job before returning a report
/// - Stops submitting new rows when [`Indexer::shutdown`] is called
pub struct Indexer {
    sink: Arc<dyn DocumentSink>,
    endpoint: UpdateEndpoint,
    config: DispatcherConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl Indexer {
    /// Create a new indexer with the default dispatcher configuration.
    pub fn new(sink: Arc<dyn DocumentSink>, endpoint: UpdateEndpoint) -> Self {
        Self::with_config(sink, endpoint, DispatcherConfig::default())
    }

    /// Create a new indexer with a custom dispatcher configuration.
    pub fn with_config(
        sink: Arc<dyn DocumentSink>,
        endpoint: UpdateEndpoint,
        config: DispatcherConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            sink,
            endpoint,
            config,
            shutdown_tx,
        }
    }

    pub fn endpoint(&self) -> &UpdateEndpoint {
        &self.endpoint
    }

    /// Run one file through the pipeline and wait for every job to finish.
    ///
    /// Failed posts are counted in the report and do not fail the run.
    ///
    /// # Errors
    ///
    /// * `PipelineError::ConfigError` - if the request is incomplete
    /// * `PipelineError::SourceError` - if the file cannot be opened or a
    ///   row cannot be read; jobs submitted before a read error are still
    ///   drained
    /// * `PipelineError::ProducerError` - if the producer thread panics
    #[instrument(
        skip(self, request),
        fields(path = %request.file_path.display(), format = %request.file_format)
    )]
    pub async fn start_index(&self, request: IndexRequest) -> Result<IndexReport, PipelineError> {
        let started_at = Utc::now();
        info!(endpoint = %self.endpoint, "Starting index run");

        let (outcome, summary) = match request.file_format {
            FileFormat::SolrXml => self.index_xml(&request).await?,
            FileFormat::Delimited => self.index_delimited(&request).await?,
        };

        let report = IndexReport {
            file_format: request.file_format,
            rows_read: outcome.rows_read,
            summary,
            cancelled: outcome.cancelled,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            rows_read = report.rows_read,
            submitted = summary.submitted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            cancelled = report.cancelled,
            "Index run complete"
        );
        Ok(report)
    }

    /// Stop the current run from submitting further rows.
    ///
    /// Jobs already submitted are still posted. Runs started after this
    /// call are not affected.
    pub fn shutdown(&self) {
        if self.shutdown_tx.send(()).is_err() {
            warn!("Shutdown requested with no index run in progress");
        }
    }

    async fn index_xml(
        &self,
        request: &IndexRequest,
    ) -> Result<(ProducerOutcome, DispatchSummary), PipelineError> {
        let payload = read_xml_document(&request.file_path).await?;

        let dispatcher = self.spawn_dispatcher();
        dispatcher.submit(payload).await?;
        let summary = dispatcher.drain().await;

        Ok((ProducerOutcome::default(), summary))
    }

    async fn index_delimited(
        &self,
        request: &IndexRequest,
    ) -> Result<(ProducerOutcome, DispatchSummary), PipelineError> {
        let (delimiter, processor) = request.row_processor()?;
        let source = RowSource::open(&request.file_path, delimiter)?;

        let dispatcher = self.spawn_dispatcher();
        let submitter = dispatcher.submitter();
        let shutdown_rx = self.shutdown_tx.subscribe();

        let produced = tokio::task::spawn_blocking(move || {
            produce(source, &processor, submitter, shutdown_rx)
        })
        .await;

        // Jobs submitted before any producer failure are still delivered.
        let summary = dispatcher.drain().await;

        match produced {
            Ok(Ok(outcome)) => Ok((outcome, summary)),
            Ok(Err(e)) => {
                error!(error = %e, submitted = summary.submitted, "Producer stopped early");
                Err(e)
            }
            Err(e) => {
                error!(error = %e, "Producer thread failed");
                Err(PipelineError::producer(e.to_string()))
            }
        }
    }

    fn spawn_dispatcher(&self) -> Dispatcher {
        Dispatcher::spawn(Arc::clone(&self.sink), self.endpoint.clone(), self.config)
    }
}

/// Read, process and submit rows one at a time until the source is
/// exhausted or a shutdown is signalled.
fn produce(
    source: RowSource,
    processor: &RowProcessor,
    submitter: JobSubmitter,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<ProducerOutcome, PipelineError> {
    let mut outcome = ProducerOutcome::default();

    for payload in processor.payloads(source) {
        if shutdown_requested(&mut shutdown_rx) {
            info!(rows_read = outcome.rows_read, "Shutdown signal received, stopping producer");
            outcome.cancelled = true;
            break;
        }

        submitter.submit_blocking(payload?)?;
        outcome.rows_read += 1;
    }

    Ok(outcome)
}

fn shutdown_requested(shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    !matches!(shutdown_rx.try_recv(), Err(TryRecvError::Empty))
}
