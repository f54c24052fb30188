//! Ingest Errors

use std::path::PathBuf;
use thiserror::Error;
use timeseries::TableError;

/// Ingest errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Row {row}: unparseable timestamp {value:?}")]
    Timestamp { row: usize, value: String },
    #[error("Row {row}: expected {expected} fields, found {actual}")]
    FieldCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Row {row}: invalid {field} value {value:?}")]
    Field {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}
