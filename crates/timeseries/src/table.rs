//! Time-Indexed Table Implementation

use crate::{stats, TableError};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

/// Timestamp used for every table index
pub type Timestamp = NaiveDateTime;

/// A named column of measurements, `None` marking a missing value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Ordered, time-indexed table of named numeric columns.
///
/// Values are stored column-major. Every operation returns a new table; the
/// only in-place mutation is `push_row`, used while a table is being built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    index: Vec<Timestamp>,
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table with the given column names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index: Vec::new(),
            columns: names
                .into_iter()
                .map(|name| Column {
                    name: name.into(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    /// Create a table that has an index but no columns
    pub fn empty_with_index(index: Vec<Timestamp>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Build a table from an index and pre-built columns
    pub fn from_columns(index: Vec<Timestamp>, columns: Vec<Column>) -> Result<Self, TableError> {
        let mut table = Self::empty_with_index(index);
        for column in columns {
            table = table.with_column(column.name, column.values)?;
        }
        Ok(table)
    }

    /// Append a row; values are in column order
    pub fn push_row(
        &mut self,
        timestamp: Timestamp,
        values: Vec<Option<f64>>,
    ) -> Result<(), TableError> {
        if values.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        self.index.push(timestamp);
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.values.push(value);
        }
        Ok(())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// The timestamp index
    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Position of a column by name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Values of a column by name
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Single cell, `None` if the column is absent or the value is missing
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.column(name).and_then(|values| values.get(row).copied().flatten())
    }

    /// One row in column order
    pub fn row(&self, row: usize) -> Vec<Option<f64>> {
        self.columns.iter().map(|c| c.values[row]).collect()
    }

    /// Row position of a timestamp (first occurrence)
    pub fn row_of(&self, timestamp: &Timestamp) -> Option<usize> {
        self.index.iter().position(|ts| ts == timestamp)
    }

    /// Fail with every absent name if any of `names` is not a column
    pub fn require_columns(&self, names: &[&str]) -> Result<(), TableError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| self.position(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TableError::MissingColumns(missing))
        }
    }

    /// Whether the index is non-decreasing
    pub fn is_sorted(&self) -> bool {
        self.index.windows(2).all(|w| w[0] <= w[1])
    }

    /// Timestamps that occur more than once, sorted
    pub fn duplicate_timestamps(&self) -> Vec<Timestamp> {
        let mut counts: HashMap<Timestamp, usize> = HashMap::new();
        for ts in &self.index {
            *counts.entry(*ts).or_default() += 1;
        }
        let dupes: BTreeSet<Timestamp> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(ts, _)| ts)
            .collect();
        dupes.into_iter().collect()
    }

    /// Check for any repeated timestamp
    pub fn has_duplicate_index(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.index.len());
        !self.index.iter().all(|ts| seen.insert(*ts))
    }

    /// Stable sort of the rows by timestamp
    pub fn sort_by_index(&self) -> Table {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&row| self.index[row]);
        self.take_rows(&order)
    }

    /// Row range with timestamps in `[start, end]`. The index must be sorted.
    pub fn time_range(&self, start: Timestamp, end: Timestamp) -> Range<usize> {
        let lo = self.index.partition_point(|ts| *ts < start);
        let hi = self.index.partition_point(|ts| *ts <= end);
        lo..hi.max(lo)
    }

    /// Rows with timestamps in `[start, end]`. The index must be sorted.
    pub fn slice_time(&self, start: Timestamp, end: Timestamp) -> Table {
        let rows: Vec<usize> = self.time_range(start, end).collect();
        self.take_rows(&rows)
    }

    /// New table holding the given rows in the given order
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        Table {
            index: rows.iter().map(|&row| self.index[row]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: rows.iter().map(|&row| c.values[row]).collect(),
                })
                .collect(),
        }
    }

    /// Keep rows whose timestamp satisfies the predicate
    pub fn filter_rows<F>(&self, keep: F) -> Table
    where
        F: Fn(&Timestamp) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&row| keep(&self.index[row])).collect();
        self.take_rows(&rows)
    }

    /// Keep only rows without any missing value
    pub fn drop_missing(&self) -> Table {
        let rows: Vec<usize> = (0..self.len())
            .filter(|&row| self.columns.iter().all(|c| c.values[row].is_some()))
            .collect();
        self.take_rows(&rows)
    }

    /// Table with only the named columns, in the given order
    pub fn select(&self, names: &[&str]) -> Result<Table, TableError> {
        self.require_columns(names)?;
        Ok(Table {
            index: self.index.clone(),
            columns: names
                .iter()
                .filter_map(|name| self.columns.iter().find(|c| c.name == *name).cloned())
                .collect(),
        })
    }

    /// Table without the named columns; all of them must exist
    pub fn drop_columns(&self, names: &[&str]) -> Result<Table, TableError> {
        self.require_columns(names)?;
        Ok(Table {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .filter(|c| !names.contains(&c.name.as_str()))
                .cloned()
                .collect(),
        })
    }

    /// Append a column, replacing any existing column of the same name
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Table, TableError> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(TableError::ColumnLength {
                name,
                expected: self.index.len(),
                actual: values.len(),
            });
        }

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(self)
    }

    /// Rename every column through `rename`
    pub fn rename_columns<F>(mut self, rename: F) -> Table
    where
        F: Fn(&str) -> String,
    {
        for column in &mut self.columns {
            column.name = rename(&column.name);
        }
        self
    }

    /// Move every timestamp by `offset`
    pub fn shift_index(mut self, offset: Duration) -> Table {
        for ts in &mut self.index {
            *ts += offset;
        }
        self
    }

    /// Per-row mean over the named columns, skipping missing cells
    pub fn row_mean(&self, names: &[&str]) -> Result<Vec<Option<f64>>, TableError> {
        let selected = self.columns_by_name(names)?;
        Ok((0..self.len())
            .map(|row| stats::mean(selected.iter().map(|c| c.values[row])))
            .collect())
    }

    /// Per-row sample standard deviation over the named columns
    pub fn row_std(&self, names: &[&str]) -> Result<Vec<Option<f64>>, TableError> {
        let selected = self.columns_by_name(names)?;
        Ok((0..self.len())
            .map(|row| stats::sample_std(selected.iter().map(|c| c.values[row])))
            .collect())
    }

    /// Timestamp to row lookup; fails on a repeated timestamp
    pub(crate) fn index_lookup(&self) -> Result<HashMap<Timestamp, usize>, TableError> {
        let mut lookup = HashMap::with_capacity(self.index.len());
        for (row, ts) in self.index.iter().enumerate() {
            if lookup.insert(*ts, row).is_some() {
                return Err(TableError::DuplicateIndex(*ts));
            }
        }
        Ok(lookup)
    }

    pub(crate) fn from_parts(index: Vec<Timestamp>, columns: Vec<Column>) -> Table {
        Table { index, columns }
    }

    fn columns_by_name(&self, names: &[&str]) -> Result<Vec<&Column>, TableError> {
        self.require_columns(names)?;
        Ok(names
            .iter()
            .filter_map(|name| self.columns.iter().find(|c| c.name == *name))
            .collect())
    }
}
