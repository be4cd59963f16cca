//! Row cleaner.

use solr_indexer_shared::Row;

/// Remove leading and trailing whitespace from every value of `row`.
pub fn clean(row: Row) -> Row {
    row.into_values()
        .into_iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<_>>()
        .into()
}
