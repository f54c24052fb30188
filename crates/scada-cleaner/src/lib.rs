//! SCADA Cleaning
//!
//! Turns raw ingested telemetry into a canonical observation table: on the
//! sampling grid, one row per timestamp, known-bad columns removed.

mod cleaner;
mod error;

pub use cleaner::{CleanReport, Cleaner, CleanerConfig, DEFAULT_PRUNED_COLUMNS};
pub use error::CleanError;
