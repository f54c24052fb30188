//! Feature Error Types

use thiserror::Error;
use timeseries::TableError;

/// Errors during feature derivation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Referenced base columns are absent
    #[error("Schema mismatch, missing columns: {}", .0.join(", "))]
    SchemaMismatch(Vec<String>),

    /// Invalid window or lag parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Underlying table operation failed
    #[error("Table error: {0}")]
    Table(TableError),
}

impl From<TableError> for FeatureError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::MissingColumns(missing) => FeatureError::SchemaMismatch(missing),
            other => FeatureError::Table(other),
        }
    }
}
