//! Lagged Copies of the Base Table

use crate::error::FeatureError;
use crate::naming::{feature_name, FeatureKind};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use timeseries::{grid, Join, Table};
use tracing::info;

/// Default number of lag offsets
pub const DEFAULT_LAGS: usize = 6;

/// Lag configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LagConfig {
    /// Number of offsets, each one sampling period apart
    pub lags: usize,
    /// Sampling period in minutes
    pub sample_period_minutes: i64,
}

impl Default for LagConfig {
    fn default() -> Self {
        Self {
            lags: DEFAULT_LAGS,
            sample_period_minutes: grid::SAMPLE_PERIOD_MINUTES,
        }
    }
}

/// Builds a dense lagged-feature matrix
pub struct LagBuilder {
    config: LagConfig,
}

impl LagBuilder {
    /// Create a new lag builder
    pub fn new(config: LagConfig) -> Result<Self, FeatureError> {
        if config.sample_period_minutes <= 0 {
            return Err(FeatureError::InvalidConfig(
                "lag sample period must be positive".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &LagConfig {
        &self.config
    }

    /// Lagged columns for offsets 1..=N on the base table's index.
    ///
    /// Row T carries the base values from T - k periods for every k; rows
    /// lacking any of that history are dropped by the inner join.
    pub fn build(&self, base: &Table) -> Result<Table, FeatureError> {
        let period = self.config.sample_period_minutes;
        let anchor = Table::empty_with_index(base.index().to_vec());

        let shifted: Vec<Table> = (1..=self.config.lags as i64)
            .map(|k| {
                let minutes = k * period;
                base.clone()
                    .shift_index(Duration::minutes(minutes))
                    .rename_columns(|name| feature_name(name, FeatureKind::Lag, minutes))
            })
            .collect();

        let mut tables: Vec<&Table> = Vec::with_capacity(shifted.len() + 1);
        tables.push(&anchor);
        tables.extend(shifted.iter());

        let lagged = Table::concat(&tables, Join::Inner)?;
        info!(
            "Built {} lags: {} columns over {} of {} rows",
            self.config.lags,
            lagged.width(),
            lagged.len(),
            base.len()
        );
        Ok(lagged)
    }
}

impl Default for LagBuilder {
    fn default() -> Self {
        Self {
            config: LagConfig::default(),
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

    fn builder(lags: usize) -> LagBuilder {
        LagBuilder::new(LagConfig {
            lags,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_single_lag() {
        let mut base = Table::new(["col"]);
        base.push_row(at(0), vec![Some(5.0)]).unwrap();
        base.push_row(at(1), vec![Some(7.0)]).unwrap();

        let lagged = builder(1).build(&base).unwrap();
        assert_eq!(lagged.index(), &[at(1)]);
        assert_eq!(lagged.value(0, "col_t-10min"), Some(5.0));
    }

    #[test]
    fn test_default_lags_drop_first_rows() {
        let mut base = Table::new(["a", "b"]);
        for tick in 0..10 {
            base.push_row(at(tick), vec![Some(tick as f64), Some(-(tick as f64))])
                .unwrap();
        }

        let lagged = LagBuilder::default().build(&base).unwrap();
        assert_eq!(lagged.len(), 4);
        assert_eq!(lagged.width(), 12);
        assert_eq!(lagged.index()[0], at(6));

        let row = lagged.row_of(&at(9)).unwrap();
        assert_eq!(lagged.value(row, "a_t-10min"), Some(8.0));
        assert_eq!(lagged.value(row, "a_t-60min"), Some(3.0));
        assert_eq!(lagged.value(row, "b_t-30min"), Some(-6.0));
    }

    #[test]
    fn test_gap_drops_dependent_rows() {
        let mut base = Table::new(["a"]);
        for tick in [0, 1, 2, 4, 5, 6] {
            base.push_row(at(tick), vec![Some(tick as f64)]).unwrap();
        }

        let lagged = builder(2).build(&base).unwrap();
        // Tick 4 needs 3 (missing); tick 5 needs 3 too; tick 6 has 5 and 4
        assert_eq!(lagged.index(), &[at(2), at(6)]);
    }

    #[test]
    fn test_zero_lags_keeps_index() {
        let mut base = Table::new(["a"]);
        base.push_row(at(0), vec![Some(1.0)]).unwrap();

        let lagged = builder(0).build(&base).unwrap();
        assert_eq!(lagged.len(), 1);
        assert_eq!(lagged.width(), 0);
    }

    proptest! {
        #[test]
        fn prop_regular_grid_loses_first_rows(ticks in 0i64..40, lags in 0usize..8) {
            let mut base = Table::new(["a"]);
            for tick in 0..ticks {
                base.push_row(at(tick), vec![Some(tick as f64)]).unwrap();
            }

            let lagged = builder(lags).build(&base).unwrap();
            prop_assert_eq!(lagged.len(), (ticks as usize).saturating_sub(lags));
            prop_assert_eq!(lagged.width(), lags);
            for row in 0..lagged.len() {
                let current = lagged.index()[row];
                let tick = (current - at(0)).num_minutes() / 10;
                for k in 1..=lags as i64 {
                    let name = format!("a_t-{}min", 10 * k);
                    prop_assert_eq!(lagged.value(row, &name), Some((tick - k) as f64));
                }
            }
        }
    }
}
