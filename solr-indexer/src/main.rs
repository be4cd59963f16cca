use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use solr_indexer::{Dependencies, IndexerSettings, IndexingError};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Indexer failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run() -> Result<(), IndexingError> {
    let settings = IndexerSettings::from_env()?;
    let Dependencies { indexer, request } = Dependencies::new(settings).await?;

    // Ctrl-C stops new submissions; jobs already queued still finish.
    let signal_indexer = Arc::clone(&indexer);
    let signal_task = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                signal_indexer.shutdown();
            }
            Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    let result = indexer.start_index(request).await;
    signal_task.abort();
    let report = result?;

    match serde_json::to_string(&report) {
        Ok(json) => info!(report = %json, "Indexing finished"),
        Err(e) => warn!(error = %e, "Failed to serialize index report"),
    }
    Ok(())
}
