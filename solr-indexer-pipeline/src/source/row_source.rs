//! Delimited row source.
//!
//! Wraps a `csv` reader configured for headerless, ragged input and exposes
//! it as a lazy iterator of rows.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecordsIntoIter};
use tracing::info;

use crate::errors::PipelineError;
use solr_indexer_shared::Row;

/// Single ASCII character separating values in a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(u8);

impl Delimiter {
    pub const COMMA: Delimiter = Delimiter(b',');
    pub const TAB: Delimiter = Delimiter(b'\t');

    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::COMMA
    }
}

impl TryFrom<char> for Delimiter {
    type Error = PipelineError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c.is_ascii() && c != '"' && c != '\n' && c != '\r' {
            Ok(Self(c as u8))
        } else {
            Err(PipelineError::config(format!(
                "delimiter must be a single ASCII character other than a quote or line break, got {c:?}"
            )))
        }
    }
}

impl FromStr for Delimiter {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(PipelineError::config(format!(
                "delimiter must be exactly one character, got {s:?}"
            ))),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}

/// Lazy, finite, non-restartable sequence of rows.
///
/// Every line is a data row (there is no header) and rows may have
/// different lengths. Values keep their surrounding whitespace; cleaning is
/// a separate stage. Opening the same file again starts a fresh,
/// independent sequence.
///
/// Blank lines are skipped rather than read as empty rows, so they never
/// turn into documents that carry only a generated `id`.
pub struct RowSource<R = File> {
    records: StringRecordsIntoIter<R>,
    path: PathBuf,
}

impl RowSource<File> {
    /// Open a delimited file.
    ///
    /// # Errors
    ///
    /// * `PipelineError::SourceError` - if the file cannot be opened
    pub fn open(path: impl AsRef<Path>, delimiter: Delimiter) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PipelineError::unreadable(path, e))?;

        info!(path = %path.display(), delimiter = %delimiter, "Opened row source");
        Ok(Self::with_path(file, delimiter, path.to_path_buf()))
    }
}

impl<R: Read> RowSource<R> {
    /// Build a source over any reader, e.g. an in-memory buffer.
    pub fn from_reader(reader: R, delimiter: Delimiter) -> Self {
        Self::with_path(reader, delimiter, PathBuf::from("<reader>"))
    }

    fn with_path(reader: R, delimiter: Delimiter, path: PathBuf) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter.as_byte())
            .from_reader(reader)
            .into_records();

        Self { records, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = Result<Row, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|record| Row::new(record.iter().map(str::to_owned).collect()))
                .map_err(|e| PipelineError::unreadable(&self.path, e)),
        )
    }
}
