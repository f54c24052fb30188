//! Pipeline Errors

use fault_labels::LabelError;
use feature_engine::FeatureError;
use scada_cleaner::CleanError;
use scada_ingest::IngestError;
use storage::StorageError;
use thiserror::Error;
use timeseries::TableError;

/// Errors from any pipeline stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Ingest failed: {0}")]
    Ingest(#[from] IngestError),
    #[error("Cleaning failed: {0}")]
    Clean(#[from] CleanError),
    #[error("Feature derivation failed: {0}")]
    Feature(#[from] FeatureError),
    #[error("Labelling failed: {0}")]
    Label(#[from] LabelError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}
