//! Source module for the bulk indexing pipeline.
//!
//! Reads input files: delimited files row by row, or a pre-built Solr XML
//! document in one piece.

mod row_source;
mod xml_document;

pub use row_source::{Delimiter, RowSource};
pub use xml_document::{normalize_xml_lines, read_xml_document};
