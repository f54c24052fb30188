//! Trailing-Window Statistics

use crate::error::FeatureError;
use crate::naming::{feature_name, FeatureKind};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use timeseries::{grid, stats, Column, Table};
use tracing::{debug, info, warn};

/// Window configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Trailing window length in minutes
    pub window_minutes: i64,
    /// Sampling period of the grid in minutes
    pub sample_period_minutes: i64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_minutes: 120,
            sample_period_minutes: grid::SAMPLE_PERIOD_MINUTES,
        }
    }
}

impl WindowConfig {
    /// Rows in a fully populated window, both ends included
    pub fn expected_count(&self) -> usize {
        (self.window_minutes / self.sample_period_minutes) as usize + 1
    }

    /// Window length in whole hours, used in column names
    pub fn hours(&self) -> i64 {
        self.window_minutes / 60
    }

    fn validate(&self) -> Result<(), FeatureError> {
        if self.sample_period_minutes <= 0 || self.window_minutes <= 0 {
            return Err(FeatureError::InvalidConfig(
                "window and sample period must be positive".to_string(),
            ));
        }
        if self.window_minutes % 60 != 0 {
            return Err(FeatureError::InvalidConfig(format!(
                "window of {} minutes is not a whole number of hours",
                self.window_minutes
            )));
        }
        Ok(())
    }
}

/// Computes trailing mean and standard deviation for every column
pub struct WindowAggregator {
    config: WindowConfig,
}

impl WindowAggregator {
    /// Create a new aggregator
    pub fn new(config: WindowConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Trailing-window statistics over `[T - window, T]` for each row T.
    ///
    /// The mean is defined only when the window holds exactly
    /// `expected_count` rows. The standard deviation uses whatever rows fall
    /// in the window. The base table must be sorted with a unique index.
    pub fn aggregate(&self, base: &Table) -> Result<Table, FeatureError> {
        if !base.is_sorted() || base.has_duplicate_index() {
            return Err(FeatureError::InvalidConfig(
                "window aggregation needs a sorted, deduplicated index".to_string(),
            ));
        }

        let index = base.index();
        let window = Duration::minutes(self.config.window_minutes);
        let expected = self.config.expected_count();
        let hours = self.config.hours();

        let mut means: Vec<Column> = base
            .columns()
            .iter()
            .map(|c| Column {
                name: feature_name(&c.name, FeatureKind::WindowMean, hours),
                values: Vec::with_capacity(index.len()),
            })
            .collect();
        let mut stds: Vec<Column> = base
            .columns()
            .iter()
            .map(|c| Column {
                name: feature_name(&c.name, FeatureKind::WindowStd, hours),
                values: Vec::with_capacity(index.len()),
            })
            .collect();

        let mut start = 0;
        let mut full_windows = 0usize;
        for (end, ts) in index.iter().enumerate() {
            let lower = *ts - window;
            while index[start] < lower {
                start += 1;
            }

            let rows = start..end + 1;
            let full = rows.len() == expected;
            if full {
                full_windows += 1;
            }

            for (i, column) in base.columns().iter().enumerate() {
                let cells = &column.values[rows.clone()];
                means[i].values.push(if full {
                    stats::mean(cells.iter().copied())
                } else {
                    None
                });
                stds[i].values.push(stats::sample_std(cells.iter().copied()));
            }
        }

        if !index.is_empty() && full_windows == 0 {
            warn!(
                "No fully populated {}-minute window in {} rows",
                self.config.window_minutes,
                index.len()
            );
        }
        debug!(
            "{} of {} rows have a full {}-row window",
            full_windows,
            index.len(),
            expected
        );

        means.extend(stds);
        let table = Table::from_columns(index.to_vec(), means)?;
        info!(
            "Computed {}hr window statistics: {} columns over {} rows",
            hours,
            table.width(),
            table.len()
        );
        Ok(table)
    }
}

impl Default for WindowAggregator {
    fn default() -> Self {
        Self {
            config: WindowConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use timeseries::Timestamp;

    fn at(tick: i64) -> Timestamp {
        NaiveDate::from_ymd_opt(2014, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(10 * tick)
    }

    fn ramp(ticks: impl IntoIterator<Item = i64>) -> Table {
        let mut table = Table::new(["v"]);
        for tick in ticks {
            table.push_row(at(tick), vec![Some(tick as f64)]).unwrap();
        }
        table
    }

    #[test]
    fn test_expected_count() {
        assert_eq!(WindowConfig::default().expected_count(), 13);
    }

    #[test]
    fn test_regular_grid_three_hours() {
        // 3 hours of 10-minute ticks: 0..=18
        let stats = WindowAggregator::default().aggregate(&ramp(0..=18)).unwrap();
        let means = stats.column("2hr_mean_v").unwrap();

        for tick in 0..=18usize {
            if tick >= 12 {
                // Mean of tick-12..=tick is tick-6
                assert_eq!(means[tick], Some(tick as f64 - 6.0), "tick {tick}");
            } else {
                assert_eq!(means[tick], None, "tick {tick}");
            }
        }
    }

    #[test]
    fn test_missing_tick_voids_mean_keeps_std() {
        // Tick 14 is missing
        let table = ramp((0..=20).filter(|&t| t != 14));
        let stats = WindowAggregator::default().aggregate(&table).unwrap();

        let row_of = |tick| stats.row_of(&at(tick)).unwrap();
        assert!(stats.value(row_of(13), "2hr_mean_v").is_some());
        // Every window ending at 15..=20 contains the gap
        for tick in [15, 20] {
            assert_eq!(stats.value(row_of(tick), "2hr_mean_v"), None, "tick {tick}");
            assert!(stats.value(row_of(tick), "2hr_std_v").is_some(), "tick {tick}");
        }
    }

    #[test]
    fn test_std_computed_on_short_windows() {
        let stats = WindowAggregator::default().aggregate(&ramp(0..=3)).unwrap();
        let stds = stats.column("2hr_std_v").unwrap();

        // A single row has no sample spread
        assert_eq!(stds[0], None);
        // Rows 0 and 1: values 0, 1
        assert!((stds[1].unwrap() - 0.5f64.sqrt()).abs() < 1e-12);
        assert!(stats.column("2hr_mean_v").unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn test_window_bounds_inclusive() {
        // Exactly 2 hours back is inside the window
        let stats = WindowAggregator::default().aggregate(&ramp(0..=12)).unwrap();
        assert_eq!(stats.value(12, "2hr_mean_v"), Some(6.0));
    }

    #[test]
    fn test_irregular_row_overfills_window() {
        let mut table = Table::new(["v"]);
        for tick in 0..=12 {
            table.push_row(at(tick), vec![Some(1.0)]).unwrap();
            if tick == 5 {
                table
                    .push_row(at(5) + Duration::minutes(5), vec![Some(1.0)])
                    .unwrap();
            }
        }

        let stats = WindowAggregator::default().aggregate(&table).unwrap();
        let last = table.len() - 1;
        // 14 rows in the window: too many for a defined mean
        assert_eq!(stats.value(last, "2hr_mean_v"), None);
        assert_eq!(stats.value(last, "2hr_std_v"), Some(0.0));
    }

    #[test]
    fn test_missing_cells_skipped_in_full_window() {
        let mut table = Table::new(["v"]);
        for tick in 0..=12 {
            let value = if tick == 0 { None } else { Some(2.0) };
            table.push_row(at(tick), vec![value]).unwrap();
        }
        let stats = WindowAggregator::default().aggregate(&table).unwrap();
        assert_eq!(stats.value(12, "2hr_mean_v"), Some(2.0));
        assert_eq!(stats.value(12, "2hr_std_v"), Some(0.0));
    }

    #[test]
    fn test_unsorted_input_rejected() {
        let table = ramp([2, 1, 0]);
        assert!(matches!(
            WindowAggregator::default().aggregate(&table),
            Err(FeatureError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_column_order() {
        let stats = WindowAggregator::default().aggregate(&ramp(0..=1)).unwrap();
        assert_eq!(
            stats.column_names().collect::<Vec<_>>(),
            vec!["2hr_mean_v", "2hr_std_v"]
        );
    }

    #[test]
    fn test_invalid_config() {
        let config = WindowConfig {
            window_minutes: 90,
            ..Default::default()
        };
        assert!(WindowAggregator::new(config).is_err());
    }

    proptest! {
        #[test]
        fn prop_mean_defined_only_with_full_history(
            gaps in proptest::collection::btree_set(0i64..30, 0..6)
        ) {
            let ticks: Vec<i64> = (0..30).filter(|t| !gaps.contains(t)).collect();
            let stats = WindowAggregator::default().aggregate(&ramp(ticks.clone())).unwrap();

            for (row, tick) in ticks.iter().enumerate() {
                let full = *tick >= 12 && (tick - 12..=*tick).all(|t| !gaps.contains(&t));
                prop_assert_eq!(stats.value(row, "2hr_mean_v").is_some(), full);
            }
        }
    }
}
