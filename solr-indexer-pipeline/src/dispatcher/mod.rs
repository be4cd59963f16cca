//! Dispatcher module for the bulk indexing pipeline.
//!
//! Posts payloads to the update endpoint through a bounded pool of worker
//! tasks and supports drain-and-join completion.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_channel::{Receiver, Sender};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use solr_indexer_repository::{DocumentSink, UpdateEndpoint};
use solr_indexer_shared::Payload;

/// Configuration for the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct DispatcherConfig {
    /// Number of concurrent worker tasks.
    pub pool_size: usize,
    /// Number of jobs that may wait for a free worker before submission
    /// applies back-pressure.
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            pool_size: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4),
            queue_capacity: 1000,
        }
    }
}

impl DispatcherConfig {
    /// Create a config with a custom pool size.
    pub fn with_pool_size(pool_size: usize) -> Self {
        Self {
            pool_size,
            ..Self::default()
        }
    }
}

/// One unit of concurrent delivery work.
#[derive(Debug)]
pub struct DispatchJob {
    /// Submission order, starting at 0.
    pub seq: u64,
    pub endpoint: Arc<UpdateEndpoint>,
    pub payload: Payload,
}

/// Outcome of a dispatcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    /// Jobs accepted by the dispatcher.
    pub submitted: usize,
    /// Jobs whose post returned a success status.
    pub succeeded: usize,
    /// Jobs whose post failed with a transport error or error status.
    pub failed: usize,
}

#[derive(Debug, Default)]
struct DispatchCounters {
    next_seq: AtomicU64,
    submitted: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

impl DispatchCounters {
    fn summary(&self) -> DispatchSummary {
        DispatchSummary {
            submitted: self.submitted.load(Ordering::SeqCst),
            succeeded: self.succeeded.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

/// Cloneable handle that hands jobs to the dispatcher's queue.
///
/// Every submitter must be dropped before [`Dispatcher::drain`] can finish.
#[derive(Debug, Clone)]
pub struct JobSubmitter {
    sender: Sender<DispatchJob>,
    endpoint: Arc<UpdateEndpoint>,
    counters: Arc<DispatchCounters>,
}

impl JobSubmitter {
    fn job(&self, payload: Payload) -> DispatchJob {
        DispatchJob {
            seq: self.counters.next_seq.fetch_add(1, Ordering::SeqCst),
            endpoint: Arc::clone(&self.endpoint),
            payload,
        }
    }

    /// Queue a payload, waiting only while the queue is full.
    pub async fn submit(&self, payload: Payload) -> Result<(), PipelineError> {
        self.sender
            .send(self.job(payload))
            .await
            .map_err(|_| PipelineError::dispatch("all dispatch workers have stopped"))?;
        self.counters.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Queue a payload from a blocking (non-async) thread.
    ///
    /// Must not be called from within an async task.
    pub fn submit_blocking(&self, payload: Payload) -> Result<(), PipelineError> {
        self.sender
            .send_blocking(self.job(payload))
            .map_err(|_| PipelineError::dispatch("all dispatch workers have stopped"))?;
        self.counters.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Bounded worker pool that posts payloads to one update endpoint.
///
/// The dispatcher:
/// - Runs `pool_size` worker tasks pulling from a shared bounded queue
/// - Lets submission continue without waiting for earlier jobs to finish
/// - Logs and counts failed posts without stopping the other workers
/// - Waits for every queued and in-flight job in [`Dispatcher::drain`]
pub struct Dispatcher {
    submitter: JobSubmitter,
    workers: JoinSet<()>,
    counters: Arc<DispatchCounters>,
}

impl Dispatcher {
    /// Start the worker pool. Must be called from within a Tokio runtime.
    pub fn spawn(
        sink: Arc<dyn DocumentSink>,
        endpoint: UpdateEndpoint,
        config: DispatcherConfig,
    ) -> Self {
        let pool_size = config.pool_size.max(1);
        let (sender, receiver) =
            async_channel::bounded::<DispatchJob>(config.queue_capacity.max(1));
        let counters = Arc::new(DispatchCounters::default());

        let mut workers = JoinSet::new();
        for worker_id in 0..pool_size {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&sink),
                receiver.clone(),
                Arc::clone(&counters),
            ));
        }

        info!(
            endpoint = %endpoint,
            pool_size = pool_size,
            queue_capacity = config.queue_capacity,
            "Started dispatcher"
        );

        Self {
            submitter: JobSubmitter {
                sender,
                endpoint: Arc::new(endpoint),
                counters: Arc::clone(&counters),
            },
            workers,
            counters,
        }
    }

    /// A new handle for submitting jobs, e.g. from a producer thread.
    pub fn submitter(&self) -> JobSubmitter {
        self.submitter.clone()
    }

    /// Queue a payload, waiting only while the queue is full.
    pub async fn submit(&self, payload: Payload) -> Result<(), PipelineError> {
        self.submitter.submit(payload).await
    }

    /// Stop accepting jobs and wait until every submitted job has finished.
    #[instrument(skip(self))]
    pub async fn drain(self) -> DispatchSummary {
        let Self {
            submitter,
            mut workers,
            counters,
        } = self;
        drop(submitter);

        while let Some(result) = workers.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Dispatch worker terminated abnormally");
            }
        }

        let summary = counters.summary();
        info!(
            submitted = summary.submitted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Dispatcher drained"
        );
        summary
    }
}

async fn run_worker(
    worker_id: usize,
    sink: Arc<dyn DocumentSink>,
    receiver: Receiver<DispatchJob>,
    counters: Arc<DispatchCounters>,
) {
    loop {
        // Closed and empty once every submitter is dropped.
        let Ok(job) = receiver.recv().await else {
            break;
        };

        match sink.post(&job.endpoint, &job.payload).await {
            Ok(()) => {
                counters.succeeded.fetch_add(1, Ordering::SeqCst);
                debug!(worker_id = worker_id, seq = job.seq, "Posted payload");
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::SeqCst);
                warn!(
                    worker_id = worker_id,
                    seq = job.seq,
                    endpoint = %job.endpoint,
                    error = %e,
                    "Failed to post payload"
                );
            }
        }
    }

    debug!(worker_id = worker_id, "Dispatch worker finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use solr_indexer_repository::SolrError;
    use std::collections::HashSet;
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// Mock sink that records every payload and fails every `fail_every`-th call.
    struct MockSink {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        received: Mutex<Vec<String>>,
        fail_every: Option<usize>,
        delay: Duration,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
                fail_every: None,
                delay: Duration::ZERO,
            }
        }

        fn failing_every(mut self, n: usize) -> Self {
            self.fail_every = Some(n);
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl DocumentSink for MockSink {
        async fn post(&self, _endpoint: &UpdateEndpoint, payload: &Payload) -> Result<(), SolrError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if matches!(self.fail_every, Some(n) if call % n == 0) {
                return Err(SolrError::connection("injected failure"));
            }
            self.received.lock().await.push(payload.as_str().to_string());
            Ok(())
        }
    }

    fn endpoint() -> UpdateEndpoint {
        UpdateEndpoint::new("http://localhost:8983/solr/animals/update/")
    }

    fn config(pool_size: usize) -> DispatcherConfig {
        DispatcherConfig {
            pool_size,
            queue_capacity: 16,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_drain_waits_for_all_jobs() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(1)));
        let dispatcher = Dispatcher::spawn(sink.clone(), endpoint(), config(8));

        for i in 0..1000 {
            dispatcher.submit(Payload::new(format!("doc-{i}"))).await.unwrap();
        }
        let summary = dispatcher.drain().await;

        assert_eq!(
            summary,
            DispatchSummary {
                submitted: 1000,
                succeeded: 1000,
                failed: 0
            }
        );

        let received = sink.received.lock().await;
        let unique: HashSet<&String> = received.iter().collect();
        assert_eq!(unique.len(), 1000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failures_do_not_abort_run() {
        // Every 20th call fails: 5% of 1000 jobs.
        let sink = Arc::new(MockSink::new().failing_every(20));
        let dispatcher = Dispatcher::spawn(sink.clone(), endpoint(), config(8));

        for i in 0..1000 {
            dispatcher.submit(Payload::new(format!("doc-{i}"))).await.unwrap();
        }
        let summary = dispatcher.drain().await;

        assert_eq!(summary.submitted, 1000);
        assert_eq!(summary.failed, 50);
        assert_eq!(summary.succeeded, 950);
        assert_eq!(sink.received.lock().await.len(), 950);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded_by_pool_size() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(5)));
        let dispatcher = Dispatcher::spawn(sink.clone(), endpoint(), config(3));

        for i in 0..60 {
            dispatcher.submit(Payload::new(format!("doc-{i}"))).await.unwrap();
        }
        dispatcher.drain().await;

        let max = sink.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 3, "max in flight was {max}");
        assert!(max >= 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_worker_takes_jobs_concurrently() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(20)));
        let dispatcher = Dispatcher::spawn(sink.clone(), endpoint(), config(4));

        for i in 0..40 {
            dispatcher.submit(Payload::new(format!("doc-{i}"))).await.unwrap();
        }
        let summary = dispatcher.drain().await;

        assert_eq!(summary.succeeded, 40);
        assert_eq!(sink.max_in_flight.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_drain_with_no_jobs() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = Dispatcher::spawn(sink.clone(), endpoint(), DispatcherConfig::default());

        let summary = dispatcher.drain().await;

        assert_eq!(summary, DispatchSummary::default());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_blocking_from_producer_thread() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = Dispatcher::spawn(sink.clone(), endpoint(), config(2));
        let submitter = dispatcher.submitter();

        tokio::task::spawn_blocking(move || {
            for i in 0..100 {
                submitter
                    .submit_blocking(Payload::new(format!("doc-{i}")))
                    .unwrap();
            }
        })
        .await
        .unwrap();

        let summary = dispatcher.drain().await;
        assert_eq!(summary.submitted, 100);
        assert_eq!(summary.succeeded, 100);
    }

    #[test]
    fn test_default_pool_size_is_positive() {
        let config = DispatcherConfig::default();
        assert!(config.pool_size >= 1);
        assert_eq!(config.queue_capacity, 1000);
        assert_eq!(DispatcherConfig::with_pool_size(8).pool_size, 8);
    }
}
