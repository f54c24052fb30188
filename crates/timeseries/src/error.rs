//! Table Error Types

use crate::Timestamp;
use thiserror::Error;

/// Errors raised by table operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// One or more referenced columns are absent
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Concatenation would produce two columns with the same name
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A join input has a repeated timestamp
    #[error("Duplicate timestamp in index: {0}")]
    DuplicateIndex(Timestamp),

    /// Row does not match the table width
    #[error("Row width mismatch: expected {expected}, got {actual}")]
    RowWidth { expected: usize, actual: usize },

    /// Column does not match the index length
    #[error("Column {name} has {actual} values, index has {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}
