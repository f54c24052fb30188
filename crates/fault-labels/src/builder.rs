//! Label Builder Implementation

use crate::LabelError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use timeseries::Timestamp;
use tracing::{debug, info, warn};

/// Label for rows outside any tracked fault interval
pub const NORMAL: i32 = 0;

/// Main-status codes treated as faults
pub const DEFAULT_FAULT_CODES: [i32; 5] = [80, 62, 228, 60, 9];

/// One entry of the status log: a status active from `start_time` until the
/// next entry begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub start_time: Timestamp,
    pub main_status: i32,
}

impl StatusEvent {
    pub fn new(start_time: Timestamp, main_status: i32) -> Self {
        Self {
            start_time,
            main_status,
        }
    }
}

/// Label configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Main-status codes that produce a non-zero label
    pub tracked_codes: Vec<i32>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            tracked_codes: DEFAULT_FAULT_CODES.to_vec(),
        }
    }
}

/// One label per timestamp of an observation index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSeries {
    index: Vec<Timestamp>,
    labels: Vec<i32>,
}

impl LabelSeries {
    /// All-normal series over an index
    pub fn normal(index: &[Timestamp]) -> Self {
        Self {
            index: index.to_vec(),
            labels: vec![NORMAL; index.len()],
        }
    }

    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at a timestamp, if the timestamp is in the index
    pub fn get(&self, timestamp: &Timestamp) -> Option<i32> {
        self.index
            .iter()
            .position(|ts| ts == timestamp)
            .map(|row| self.labels[row])
    }

    /// Number of rows per label
    pub fn counts(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.labels {
            *counts.entry(*label).or_default() += 1;
        }
        counts
    }

    /// Re-index onto `index`, which must be drawn from this series' index
    pub fn align_to(&self, index: &[Timestamp]) -> Result<LabelSeries, LabelError> {
        let lookup: HashMap<Timestamp, i32> = self
            .index
            .iter()
            .copied()
            .zip(self.labels.iter().copied())
            .collect();

        let labels = index
            .iter()
            .map(|ts| lookup.get(ts).copied().ok_or(LabelError::UncoveredTimestamp(*ts)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LabelSeries {
            index: index.to_vec(),
            labels,
        })
    }

    /// Rows whose timestamp lies strictly inside `(start, end)`
    fn open_interval(&self, start: Timestamp, end: Option<Timestamp>) -> Range<usize> {
        let lo = self.index.partition_point(|ts| *ts <= start);
        let hi = match end {
            Some(end) => self.index.partition_point(|ts| *ts < end),
            None => self.index.len(),
        };
        lo..hi.max(lo)
    }
}

/// Builds fault labels from a status log
pub struct LabelBuilder {
    config: LabelConfig,
}

impl LabelBuilder {
    /// Create a new label builder
    pub fn new(config: LabelConfig) -> Self {
        Self { config }
    }

    /// Whether a main-status code is a tracked fault
    pub fn is_tracked(&self, main_status: i32) -> bool {
        self.config.tracked_codes.contains(&main_status)
    }

    /// Label every timestamp of `index` from the status log.
    ///
    /// Events are applied in log order, each over the open interval between
    /// its start and the next event's start (unbounded for the last event).
    /// An observation exactly at an event boundary keeps its previous label.
    pub fn build(&self, index: &[Timestamp], events: &[StatusEvent]) -> LabelSeries {
        if !events.windows(2).all(|w| w[0].start_time <= w[1].start_time) {
            warn!("Status log is not time-ordered; applying events in log order");
        }

        let sorted = index.windows(2).all(|w| w[0] <= w[1]);
        let mut series = LabelSeries::normal(index);
        let mut applied = 0usize;

        for (i, event) in events.iter().enumerate() {
            if !self.is_tracked(event.main_status) {
                continue;
            }

            let start = event.start_time;
            let end = events.get(i + 1).map(|next| next.start_time);

            if sorted {
                let rows = series.open_interval(start, end);
                series.labels[rows].fill(event.main_status);
            } else {
                for (ts, label) in series.index.iter().zip(series.labels.iter_mut()) {
                    if *ts > start && end.map_or(true, |end| *ts < end) {
                        *label = event.main_status;
                    }
                }
            }
            applied += 1;
        }

        debug!("Applied {} tracked status events of {}", applied, events.len());
        info!("Built fault labels: {:?}", series.counts());

        series
    }
}

impl Default for LabelBuilder {
    fn default() -> Self {
        Self::new(LabelConfig::default())
    }
}
