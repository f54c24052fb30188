//! Fault Labelling
//!
//! Maps a time-ordered status log onto the observation index. Only a small
//! set of tracked main-status codes produce non-zero labels.

mod builder;

pub use builder::{LabelBuilder, LabelConfig, LabelSeries, StatusEvent, DEFAULT_FAULT_CODES, NORMAL};

use thiserror::Error;
use timeseries::Timestamp;

/// Label errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabelError {
    #[error("Timestamp {0} is not covered by the label series")]
    UncoveredTimestamp(Timestamp),
}
