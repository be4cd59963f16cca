//! Run settings read from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::IndexingError;
use solr_indexer_pipeline::{Delimiter, DispatcherConfig, EscapeMode, FileFormat, IndexRequest};

/// Default Solr base URL.
const DEFAULT_SOLR_HOST: &str = "http://localhost:8983/solr/";

/// Default request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Everything the binary needs for one run.
#[derive(Debug, Clone)]
pub struct IndexerSettings {
    pub solr_host: String,
    pub solr_collection: String,
    pub request_timeout: Duration,
    /// Create the collection with this many shards before indexing.
    pub create_shards: Option<u32>,
    pub request: IndexRequest,
    pub dispatcher: DispatcherConfig,
}

impl IndexerSettings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `SOLR_HOST`: Solr base URL (default: http://localhost:8983/solr/)
    /// - `SOLR_COLLECTION`: Target collection (required)
    /// - `SOLR_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 30)
    /// - `SOLR_CREATE_SHARDS`: Create the collection with N shards first
    /// - `INDEX_FILE_PATH`: Input file (required)
    /// - `INDEX_FILE_FORMAT`: `solrxml` or `csv` (default: solrxml)
    /// - `INDEX_DELIMITER`: One character, or `tab` (required for csv)
    /// - `INDEX_FIELDS`: Comma-separated field names (required for csv)
    /// - `INDEX_UNIQUE_ID`: Inject a UUID `id` per document (default: true)
    /// - `INDEX_KEEP_ROW`: Keep the joined row under `row` (default: false)
    /// - `INDEX_STRICT_ESCAPE`: XML-escape names and values (default: false)
    /// - `INDEX_POOL_SIZE`: Worker count (default: available parallelism)
    /// - `INDEX_QUEUE_CAPACITY`: Pending job limit (default: 1000)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let solr_host = get("SOLR_HOST").unwrap_or_else(|| DEFAULT_SOLR_HOST.to_string());
        let solr_collection = get("SOLR_COLLECTION")
            .ok_or_else(|| IndexingError::config("SOLR_COLLECTION is required"))?;
        let request_timeout = Duration::from_secs(
            parse_var(&get, "SOLR_REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );
        let create_shards = parse_var(&get, "SOLR_CREATE_SHARDS")?;

        let file_path = get("INDEX_FILE_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| IndexingError::config("INDEX_FILE_PATH is required"))?;
        let file_format = match get("INDEX_FILE_FORMAT") {
            Some(value) => value.parse::<FileFormat>()?,
            None => FileFormat::default(),
        };
        // A space or tab is a valid delimiter, so only an empty value is unset.
        let delimiter = lookup("INDEX_DELIMITER")
            .filter(|value| !value.is_empty())
            .map(|value| parse_delimiter(&value))
            .transpose()?;
        let fields = get("INDEX_FIELDS")
            .map(|value| value.split(',').map(|name| name.trim().to_string()).collect())
            .unwrap_or_default();

        let escape = if parse_flag(&get, "INDEX_STRICT_ESCAPE")?.unwrap_or(false) {
            EscapeMode::Strict
        } else {
            EscapeMode::Raw
        };

        let request = IndexRequest {
            file_format,
            delimiter,
            fields,
            ..IndexRequest::solr_xml(file_path)
        }
        .with_unique_id(parse_flag(&get, "INDEX_UNIQUE_ID")?.unwrap_or(true))
        .with_keep_row(parse_flag(&get, "INDEX_KEEP_ROW")?.unwrap_or(false))
        .with_escape(escape);

        let defaults = DispatcherConfig::default();
        let dispatcher = DispatcherConfig {
            pool_size: parse_var(&get, "INDEX_POOL_SIZE")?.unwrap_or(defaults.pool_size),
            queue_capacity: parse_var(&get, "INDEX_QUEUE_CAPACITY")?
                .unwrap_or(defaults.queue_capacity),
        };
        if dispatcher.pool_size == 0 || dispatcher.queue_capacity == 0 {
            return Err(IndexingError::config(
                "INDEX_POOL_SIZE and INDEX_QUEUE_CAPACITY must be positive",
            ));
        }

        Ok(Self {
            solr_host,
            solr_collection,
            request_timeout,
            create_shards,
            request,
            dispatcher,
        })
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>, IndexingError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| IndexingError::config(format!("invalid {key} {value:?}: {e}")))
        })
        .transpose()
}

fn parse_flag<G>(get: &G, key: &str) -> Result<Option<bool>, IndexingError>
where
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(IndexingError::config(format!(
                "invalid {key} {value:?}: expected true or false"
            ))),
        })
        .transpose()
}

fn parse_delimiter(value: &str) -> Result<Delimiter, IndexingError> {
    match value {
        "tab" | "\\t" => Ok(Delimiter::TAB),
        other => Ok(other.parse::<Delimiter>()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<IndexerSettings, IndexingError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IndexerSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_minimal_settings_use_defaults() {
        let settings = settings(&[
            ("SOLR_COLLECTION", "animals"),
            ("INDEX_FILE_PATH", "/data/animals.xml"),
        ])
        .unwrap();

        assert_eq!(settings.solr_host, DEFAULT_SOLR_HOST);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.create_shards, None);
        assert_eq!(settings.request.file_format, FileFormat::SolrXml);
        assert!(settings.request.unique_id);
        assert!(!settings.request.keep_row);
        assert_eq!(settings.request.escape, EscapeMode::Raw);
        assert_eq!(settings.dispatcher.queue_capacity, 1000);
    }

    #[test]
    fn test_csv_settings() {
        let settings = settings(&[
            ("SOLR_HOST", "http://solr:8983/solr"),
            ("SOLR_COLLECTION", "animals"),
            ("SOLR_CREATE_SHARDS", "2"),
            ("INDEX_FILE_PATH", "/data/animals.tsv"),
            ("INDEX_FILE_FORMAT", "csv"),
            ("INDEX_DELIMITER", "tab"),
            ("INDEX_FIELDS", "food, talk"),
            ("INDEX_UNIQUE_ID", "false"),
            ("INDEX_KEEP_ROW", "yes"),
            ("INDEX_STRICT_ESCAPE", "1"),
            ("INDEX_POOL_SIZE", "8"),
        ])
        .unwrap();

        assert_eq!(settings.create_shards, Some(2));
        assert_eq!(settings.request.file_format, FileFormat::Delimited);
        assert_eq!(settings.request.delimiter, Some(Delimiter::TAB));
        assert_eq!(settings.request.fields, vec!["food", "talk"]);
        assert!(!settings.request.unique_id);
        assert!(settings.request.keep_row);
        assert_eq!(settings.request.escape, EscapeMode::Strict);
        assert_eq!(settings.dispatcher.pool_size, 8);
    }

    #[test]
    fn test_whitespace_delimiters() {
        for (raw, expected) in [(" ", b' '), ("\t", b'\t')] {
            let settings = settings(&[
                ("SOLR_COLLECTION", "animals"),
                ("INDEX_FILE_PATH", "/data/animals.txt"),
                ("INDEX_FILE_FORMAT", "csv"),
                ("INDEX_FIELDS", "food,talk"),
                ("INDEX_DELIMITER", raw),
            ])
            .unwrap();

            assert_eq!(settings.request.delimiter.map(Delimiter::as_byte), Some(expected));
        }
    }

    #[test]
    fn test_empty_delimiter_is_unset() {
        let settings = settings(&[
            ("SOLR_COLLECTION", "animals"),
            ("INDEX_FILE_PATH", "/data/animals.txt"),
            ("INDEX_DELIMITER", ""),
        ])
        .unwrap();

        assert_eq!(settings.request.delimiter, None);
    }

    #[test]
    fn test_missing_collection() {
        let result = settings(&[("INDEX_FILE_PATH", "/data/animals.xml")]);
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }

    #[test]
    fn test_missing_file_path() {
        let result = settings(&[("SOLR_COLLECTION", "animals")]);
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_values() {
        let base = [("SOLR_COLLECTION", "animals"), ("INDEX_FILE_PATH", "a.csv")];

        let bad_flag = settings(&[base[0], base[1], ("INDEX_KEEP_ROW", "maybe")]);
        assert!(matches!(bad_flag, Err(IndexingError::ConfigError(_))));

        let bad_number = settings(&[base[0], base[1], ("INDEX_POOL_SIZE", "many")]);
        assert!(matches!(bad_number, Err(IndexingError::ConfigError(_))));

        let zero_pool = settings(&[base[0], base[1], ("INDEX_POOL_SIZE", "0")]);
        assert!(matches!(zero_pool, Err(IndexingError::ConfigError(_))));

        let bad_format = settings(&[base[0], base[1], ("INDEX_FILE_FORMAT", "json")]);
        assert!(matches!(bad_format, Err(IndexingError::PipelineError(_))));

        let bad_delimiter = settings(&[base[0], base[1], ("INDEX_DELIMITER", ";;")]);
        assert!(matches!(bad_delimiter, Err(IndexingError::PipelineError(_))));
    }
}
