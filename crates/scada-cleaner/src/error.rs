//! Cleaning Error Types

use thiserror::Error;
use timeseries::TableError;

/// Errors during cleaning
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CleanError {
    /// Columns scheduled for pruning are absent from the incoming schema
    #[error("Schema mismatch, missing columns: {}", .0.join(", "))]
    SchemaMismatch(Vec<String>),

    /// Underlying table operation failed
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}
