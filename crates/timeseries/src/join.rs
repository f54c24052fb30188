//! Column-Union Concatenation on the Timestamp Index

use crate::table::{Column, Table, Timestamp};
use crate::TableError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// How timestamps from the joined tables are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Join {
    /// Keep timestamps present in every table
    Inner,
    /// Keep timestamps present in any table, filling gaps with missing values
    Outer,
}

impl Table {
    /// Concatenate tables column-wise, matching rows by timestamp.
    ///
    /// The result is sorted by timestamp regardless of input order, so the
    /// row set does not depend on which table comes first. Column names must
    /// be unique across inputs and each input index must be unique.
    pub fn concat(tables: &[&Table], join: Join) -> Result<Table, TableError> {
        let Some(first) = tables.first() else {
            return Ok(Table::default());
        };

        let mut seen = HashSet::new();
        for table in tables {
            for name in table.column_names() {
                if !seen.insert(name) {
                    return Err(TableError::DuplicateColumn(name.to_string()));
                }
            }
        }

        let lookups = tables
            .iter()
            .map(|t| t.index_lookup())
            .collect::<Result<Vec<_>, _>>()?;

        let index: Vec<Timestamp> = match join {
            Join::Inner => {
                let mut index: Vec<Timestamp> = first
                    .index()
                    .iter()
                    .copied()
                    .filter(|ts| lookups[1..].iter().all(|lookup| lookup.contains_key(ts)))
                    .collect();
                index.sort();
                index
            }
            Join::Outer => tables
                .iter()
                .flat_map(|t| t.index().iter().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };

        let mut columns = Vec::with_capacity(seen.len());
        for (table, lookup) in tables.iter().zip(&lookups) {
            for column in table.columns() {
                let values = index
                    .iter()
                    .map(|ts| lookup.get(ts).and_then(|&row| column.values[row]))
                    .collect();
                columns.push(Column {
                    name: column.name.clone(),
                    values,
                });
            }
        }

        debug!(
            "Concatenated {} tables ({:?}): {} rows x {} columns",
            tables.len(),
            join,
            index.len(),
            columns.len()
        );

        Ok(Table::from_parts(index, columns))
    }

    /// Join this table with another
    pub fn join(&self, other: &Table, join: Join) -> Result<Table, TableError> {
        Table::concat(&[self, other], join)
    }
}
