//! Time-Indexed Tables
//!
//! Provides the ordered table abstraction shared by every pipeline stage:
//! a timestamp index with named, optionally-missing `f64` columns.

mod error;
mod join;
pub mod stats;
mod table;

pub use error::TableError;
pub use join::Join;
pub use table::{Column, Table, Timestamp};

/// Sampling grid helpers
pub mod grid {
    use chrono::{Duration, Timelike};

    use crate::Timestamp;

    /// Default SCADA sampling period in minutes
    pub const SAMPLE_PERIOD_MINUTES: i64 = 10;

    /// Default sampling period
    pub fn sample_period() -> Duration {
        Duration::minutes(SAMPLE_PERIOD_MINUTES)
    }

    /// Whether the timestamp's minute component lies on a `grid_minutes` boundary
    pub fn on_grid(timestamp: &Timestamp, grid_minutes: u32) -> bool {
        grid_minutes != 0 && timestamp.minute() % grid_minutes == 0
    }
}
