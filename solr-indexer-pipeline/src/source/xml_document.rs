//! Pre-built Solr XML document source.

use std::path::Path;

use tracing::info;

use crate::errors::PipelineError;
use solr_indexer_shared::Payload;

/// Read a whole Solr XML update file into a single payload.
///
/// # Errors
///
/// * `PipelineError::SourceError` - if the file cannot be read as UTF-8 text
pub async fn read_xml_document(path: &Path) -> Result<Payload, PipelineError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PipelineError::unreadable(path, e))?;

    let payload = Payload::new(normalize_xml_lines(&content));
    info!(path = %path.display(), bytes = payload.len(), "Read XML document");
    Ok(payload)
}

/// Concatenate the lines of `content`, dropping the line terminators and the
/// spaces around each line.
///
/// Only the space character is stripped; tabs and spaces inside a line are
/// kept as they are.
pub fn normalize_xml_lines(content: &str) -> String {
    content.lines().map(|line| line.trim_matches(' ')).collect()
}
