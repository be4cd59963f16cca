//! End-to-end runs of the pipeline against an in-memory sink.

use std::collections::HashSet;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use solr_indexer_pipeline::{
    Delimiter, DispatcherConfig, EscapeMode, IndexRequest, Indexer, PipelineError,
};
use solr_indexer_repository::{DocumentSink, SolrError, UpdateEndpoint};
use solr_indexer_shared::Payload;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

struct RecordingSink {
    calls: AtomicUsize,
    fail_every: Option<usize>,
    posted: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    fn new(fail_every: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_every,
            posted: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DocumentSink for RecordingSink {
    async fn post(&self, endpoint: &UpdateEndpoint, payload: &Payload) -> Result<(), SolrError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if matches!(self.fail_every, Some(n) if call % n == 0) {
            return Err(SolrError::connection("connection reset"));
        }
        self.posted
            .lock()
            .await
            .push((endpoint.to_string(), payload.as_str().to_string()));
        Ok(())
    }
}

fn endpoint() -> UpdateEndpoint {
    UpdateEndpoint::new("http://localhost:8983/solr/animals/update/")
}

fn csv_file(rows: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for i in 0..rows {
        writeln!(file, "food{i},talk{i}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn extract_id(payload: &str) -> &str {
    let start = payload.find("<field name='id'>").unwrap() + "<field name='id'>".len();
    let end = start + payload[start..].find("</field>").unwrap();
    &payload[start..end]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn thousand_rows_with_injected_failures() -> Result<(), PipelineError> {
    let sink = RecordingSink::new(Some(20));
    let indexer = Indexer::with_config(sink.clone(), endpoint(), DispatcherConfig {
        pool_size: 8,
        queue_capacity: 1000,
    });
    let file = csv_file(1000);

    let report = indexer
        .start_index(IndexRequest::delimited(file.path(), Delimiter::COMMA, ["food", "talk"]))
        .await?;

    assert_eq!(report.rows_read, 1000);
    assert_eq!(report.summary.submitted, 1000);
    assert_eq!(report.summary.failed, 50);
    assert_eq!(report.summary.succeeded, 950);
    assert!(!report.cancelled);
    assert!(report.finished_at >= report.started_at);

    let posted = sink.posted.lock().await;
    assert_eq!(posted.len(), 950);
    assert!(posted
        .iter()
        .all(|(url, _)| url == "http://localhost:8983/solr/animals/update/"));

    let ids: HashSet<&str> = posted.iter().map(|(_, body)| extract_id(body)).collect();
    assert_eq!(ids.len(), 950);
    Ok(())
}

#[tokio::test]
async fn tab_delimited_without_id_keeps_field_order() -> Result<(), PipelineError> {
    let sink = RecordingSink::new(None);
    let indexer = Indexer::new(sink.clone(), endpoint());

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "milk\tmeow\tfour").unwrap();
    file.flush().unwrap();

    let request = IndexRequest::delimited(file.path(), Delimiter::TAB, ["food", "talk", "legs"])
        .with_unique_id(false)
        .with_escape(EscapeMode::Strict);
    let report = indexer.start_index(request).await?;

    assert_eq!(report.summary.succeeded, 1);
    let posted = sink.posted.lock().await;
    assert_eq!(
        posted[0].1,
        "<add><doc><field name='food'>milk</field><field name='talk'>meow</field>\
         <field name='legs'>four</field></doc></add>"
    );
    Ok(())
}

#[tokio::test]
async fn report_counts_rows_and_names_format() -> Result<(), PipelineError> {
    let sink = RecordingSink::new(None);
    let indexer = Indexer::new(sink, endpoint());
    let file = csv_file(3);

    let report = indexer
        .start_index(IndexRequest::delimited(file.path(), Delimiter::COMMA, ["food", "talk"]))
        .await?;

    assert_eq!(report.rows_read, 3);
    assert_eq!(report.file_format.to_string(), "csv");
    Ok(())
}
