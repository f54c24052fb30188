//! Observation Table Cleaner

use crate::error::CleanError;
use serde::{Deserialize, Serialize};
use timeseries::{grid, stats, Table, TableError};
use tracing::{debug, info};

/// Columns known to be unreliable on the CS101 turbine
pub const DEFAULT_PRUNED_COLUMNS: [&str; 10] = [
    // Faulty blade temperature sensors
    "CS101__Blade_A_temp",
    "CS101__Blade_B_temp",
    "CS101__Blade_C_temp",
    // Faulty inverter cabinet sensors
    "CS101__Sys_2_inverter_5_cabinet_temp",
    "CS101__Sys_2_inverter_6_cabinet_temp",
    "CS101__Sys_2_inverter_7_cabinet_temp",
    // Cumulative counters
    "WEC_Operating_Hours",
    "WEC_Production_kWh",
    "WEC_Production_minutes",
    "Error",
];

/// Cleaner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Sampling grid in minutes; off-grid rows are dropped
    pub grid_minutes: u32,
    /// Columns removed after alignment; all must be present
    pub pruned_columns: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            grid_minutes: grid::SAMPLE_PERIOD_MINUTES as u32,
            pruned_columns: DEFAULT_PRUNED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Summary of a cleaning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Rows received
    pub rows_in: usize,
    /// Rows dropped for lying off the grid
    pub off_grid_dropped: usize,
    /// Rows folded into another row with the same timestamp
    pub duplicates_merged: usize,
    /// Columns removed
    pub columns_pruned: usize,
    /// Rows in the cleaned table
    pub rows_out: usize,
}

/// Cleaner producing canonical observation tables
pub struct Cleaner {
    config: CleanerConfig,
}

impl Cleaner {
    /// Create a new cleaner with given config
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Filter, deduplicate, and prune a raw table
    pub fn clean(&self, raw: &Table) -> Result<Table, CleanError> {
        self.clean_with_report(raw).map(|(table, _)| table)
    }

    /// Same as [`Cleaner::clean`], also returning what was removed
    pub fn clean_with_report(&self, raw: &Table) -> Result<(Table, CleanReport), CleanError> {
        let (aligned, mut report) = self.align_with_report(raw)?;
        let pruned = self.prune(&aligned)?;

        report.columns_pruned = aligned.width() - pruned.width();
        report.rows_out = pruned.len();

        info!(
            "Cleaned SCADA table: {} rows in, {} off-grid, {} duplicates merged, {} columns pruned, {} rows out",
            report.rows_in,
            report.off_grid_dropped,
            report.duplicates_merged,
            report.columns_pruned,
            report.rows_out
        );

        Ok((pruned, report))
    }

    /// Grid filter and timestamp deduplication, without pruning
    pub fn align(&self, raw: &Table) -> Result<Table, CleanError> {
        self.align_with_report(raw).map(|(table, _)| table)
    }

    /// Remove the configured columns, failing if any is absent
    pub fn prune(&self, table: &Table) -> Result<Table, CleanError> {
        let names: Vec<&str> = self.config.pruned_columns.iter().map(String::as_str).collect();
        table.drop_columns(&names).map_err(|err| match err {
            TableError::MissingColumns(missing) => CleanError::SchemaMismatch(missing),
            other => CleanError::Table(other),
        })
    }

    fn align_with_report(&self, raw: &Table) -> Result<(Table, CleanReport), CleanError> {
        let grid_minutes = self.config.grid_minutes;
        let on_grid = raw.filter_rows(|ts| grid::on_grid(ts, grid_minutes));
        let sorted = on_grid.sort_by_index();
        let deduped = Self::average_duplicates(&sorted)?;

        let report = CleanReport {
            rows_in: raw.len(),
            off_grid_dropped: raw.len() - on_grid.len(),
            duplicates_merged: sorted.len() - deduped.len(),
            columns_pruned: 0,
            rows_out: deduped.len(),
        };

        debug!(
            "Aligned to {}-minute grid: {} -> {} rows",
            grid_minutes, report.rows_in, report.rows_out
        );

        Ok((deduped, report))
    }

    /// Collapse runs of identical timestamps into their column-wise mean.
    /// The input must be sorted.
    fn average_duplicates(sorted: &Table) -> Result<Table, TableError> {
        let mut out = Table::new(sorted.column_names());
        let index = sorted.index();

        let mut start = 0;
        while start < index.len() {
            let mut end = start + 1;
            while end < index.len() && index[end] == index[start] {
                end += 1;
            }

            let row = if end - start == 1 {
                sorted.row(start)
            } else {
                sorted
                    .columns()
                    .iter()
                    .map(|c| stats::mean(c.values[start..end].iter().copied()))
                    .collect()
            };

            out.push_row(index[start], row)?;
            start = end;
        }

        Ok(out)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(CleanerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use timeseries::Timestamp;

    fn ts(hour: u32, minute: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2014, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn unpruned() -> Cleaner {
        Cleaner::new(CleanerConfig {
            pruned_columns: Vec::new(),
            ..Default::default()
        })
    }

    #[test]
    fn test_duplicates_averaged() {
        let mut raw = Table::new(["power"]);
        raw.push_row(ts(1, 0), vec![Some(1.0)]).unwrap();
        raw.push_row(ts(1, 0), vec![Some(2.0)]).unwrap();
        raw.push_row(ts(1, 0), vec![Some(3.0)]).unwrap();

        let (clean, report) = unpruned().clean_with_report(&raw).unwrap();
        assert_eq!(clean.len(), 1);
        assert_eq!(clean.value(0, "power"), Some(2.0));
        assert_eq!(report.duplicates_merged, 2);
    }

    #[test]
    fn test_duplicate_mean_skips_missing() {
        let mut raw = Table::new(["a", "b"]);
        raw.push_row(ts(1, 0), vec![Some(4.0), None]).unwrap();
        raw.push_row(ts(1, 0), vec![None, None]).unwrap();
        raw.push_row(ts(1, 0), vec![Some(8.0), None]).unwrap();

        let clean = unpruned().align(&raw).unwrap();
        assert_eq!(clean.row(0), vec![Some(6.0), None]);
    }

    #[test]
    fn test_grid_filter() {
        let mut raw = Table::new(["power"]);
        raw.push_row(ts(1, 13), vec![Some(1.0)]).unwrap();
        raw.push_row(ts(1, 10), vec![Some(2.0)]).unwrap();

        let (clean, report) = unpruned().clean_with_report(&raw).unwrap();
        assert_eq!(clean.index(), &[ts(1, 10)]);
        assert_eq!(report.off_grid_dropped, 1);
    }

    #[test]
    fn test_output_sorted_and_unique() {
        let mut raw = Table::new(["power"]);
        for (hour, minute) in [(2, 0), (1, 0), (1, 50), (1, 0), (2, 0)] {
            raw.push_row(ts(hour, minute), vec![Some(1.0)]).unwrap();
        }

        let clean = unpruned().align(&raw).unwrap();
        assert_eq!(clean.index(), &[ts(1, 0), ts(1, 50), ts(2, 0)]);
    }

    #[test]
    fn test_default_prune_columns_removed() {
        let mut names: Vec<&str> = DEFAULT_PRUNED_COLUMNS.to_vec();
        names.push("WEC_ava_windspeed");
        let mut raw = Table::new(names.clone());
        raw.push_row(ts(0, 0), vec![Some(1.0); names.len()]).unwrap();

        let clean = Cleaner::default().clean(&raw).unwrap();
        assert_eq!(clean.column_names().collect::<Vec<_>>(), vec!["WEC_ava_windspeed"]);
    }

    #[test]
    fn test_schema_mismatch_names_missing_columns() {
        let mut raw = Table::new(["Error", "WEC_ava_windspeed"]);
        raw.push_row(ts(0, 0), vec![Some(0.0), Some(5.0)]).unwrap();

        let err = Cleaner::default().clean(&raw).unwrap_err();
        match err {
            CleanError::SchemaMismatch(missing) => {
                assert_eq!(missing.len(), DEFAULT_PRUNED_COLUMNS.len() - 1);
                assert!(missing.contains(&"CS101__Blade_A_temp".to_string()));
                assert!(!missing.contains(&"Error".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clean_twice_is_identity() {
        let mut raw = Table::new(["a"]);
        raw.push_row(ts(0, 10), vec![Some(1.0)]).unwrap();
        raw.push_row(ts(0, 0), vec![Some(3.0)]).unwrap();
        raw.push_row(ts(0, 10), vec![Some(2.0)]).unwrap();

        let cleaner = unpruned();
        let once = cleaner.clean(&raw).unwrap();
        let twice = cleaner.clean(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_second_default_clean_reports_pruned_columns() {
        let mut names: Vec<&str> = DEFAULT_PRUNED_COLUMNS.to_vec();
        names.push("WEC_ava_windspeed");
        let mut raw = Table::new(names.clone());
        raw.push_row(ts(0, 0), vec![Some(1.0); names.len()]).unwrap();

        let cleaner = Cleaner::default();
        let once = cleaner.clean(&raw).unwrap();
        assert_eq!(once.column_names().collect::<Vec<_>>(), vec!["WEC_ava_windspeed"]);
        assert!(matches!(
            cleaner.clean(&once),
            Err(CleanError::SchemaMismatch(missing)) if missing.len() == DEFAULT_PRUNED_COLUMNS.len()
        ));
    }

    proptest! {
        #[test]
        fn prop_align_idempotent(
            rows in proptest::collection::vec((0i64..240, proptest::option::of(-50.0f64..50.0)), 0..80)
        ) {
            let start = ts(0, 0);
            let mut raw = Table::new(["v"]);
            for (minute, value) in rows {
                raw.push_row(start + Duration::minutes(minute), vec![value]).unwrap();
            }

            let cleaner = Cleaner::default();
            let once = cleaner.align(&raw).unwrap();
            let twice = cleaner.align(&once).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert!(!once.has_duplicate_index());
            prop_assert!(once.is_sorted());
        }
    }
}
