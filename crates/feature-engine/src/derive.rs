//! Same-Timestamp Feature Derivation

use crate::catalog;
use crate::error::FeatureError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use timeseries::{stats, Table};
use tracing::{debug, info};

/// A column taking part in a group, with a short label used in feature names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub label: String,
    pub column: String,
}

/// Related sensors averaged together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureGroup {
    pub name: String,
    pub members: Vec<GroupMember>,
    /// Also emit each member's deviation from the group average
    pub deviations: bool,
}

impl FeatureGroup {
    /// Name of the group average column
    pub fn average_name(&self) -> String {
        format!("Avg_{}", self.name)
    }

    /// Name of a member's deviation column
    pub fn deviation_name(&self, member: &GroupMember) -> String {
        format!("Diff_{}_Avg_{}", member.label, self.name)
    }

    fn columns(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.column.as_str()).collect()
    }
}

/// Signed difference of two base columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub name: String,
    pub minuend: String,
    pub subtrahend: String,
}

/// Row mean and standard deviation across a set of columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSummary {
    pub mean_name: String,
    pub std_name: String,
    pub columns: Vec<String>,
}

impl RowSummary {
    /// Append the mean and standard deviation columns to `table`
    pub fn append_to(&self, table: Table) -> Result<Table, FeatureError> {
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        let means = table.row_mean(&columns)?;
        let stds = table.row_std(&columns)?;

        debug!(
            "Appending row summary {} / {} over {} columns",
            self.mean_name,
            self.std_name,
            columns.len()
        );

        Ok(table
            .with_column(self.mean_name.clone(), means)?
            .with_column(self.std_name.clone(), stds)?)
    }
}

impl Default for RowSummary {
    fn default() -> Self {
        catalog::inverter_summary()
    }
}

/// Every same-timestamp feature to derive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCatalog {
    pub groups: Vec<FeatureGroup>,
    pub differences: Vec<Difference>,
}

impl FeatureCatalog {
    /// Base columns referenced anywhere in the catalogue, first use first
    pub fn required_columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().map(|m| m.column.as_str()))
            .chain(
                self.differences
                    .iter()
                    .flat_map(|d| [d.minuend.as_str(), d.subtrahend.as_str()]),
            )
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Output column names in output order
    pub fn output_names(&self) -> Vec<String> {
        let averages = self.groups.iter().map(FeatureGroup::average_name);
        let differences = self.differences.iter().map(|d| d.name.clone());
        let deviations = self
            .groups
            .iter()
            .filter(|g| g.deviations)
            .flat_map(|g| g.members.iter().map(move |m| g.deviation_name(m)));

        averages.chain(differences).chain(deviations).collect()
    }

    /// Reject catalogues that would emit the same column twice
    pub fn validate(&self) -> Result<(), FeatureError> {
        let mut seen = HashSet::new();
        for name in self.output_names() {
            if !seen.insert(name.clone()) {
                return Err(FeatureError::InvalidConfig(format!(
                    "feature {name} is defined twice"
                )));
            }
        }
        Ok(())
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        catalog::enercon()
    }
}

/// Derives averages and differences row by row
pub struct FeatureDeriver {
    catalog: FeatureCatalog,
}

impl FeatureDeriver {
    /// Create a new deriver for a catalogue
    pub fn new(catalog: FeatureCatalog) -> Self {
        Self { catalog }
    }

    /// Get the catalogue
    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    /// Derive every catalogue feature on the base table's index.
    ///
    /// Fails with `SchemaMismatch` before computing anything if any
    /// referenced column is absent.
    pub fn derive(&self, base: &Table) -> Result<Table, FeatureError> {
        self.catalog.validate()?;
        base.require_columns(&self.catalog.required_columns())?;

        let mut out = Table::empty_with_index(base.index().to_vec());
        let mut averages = Vec::with_capacity(self.catalog.groups.len());

        for group in &self.catalog.groups {
            let average = base.row_mean(&group.columns())?;
            out = out.with_column(group.average_name(), average.clone())?;
            averages.push(average);
        }

        for diff in &self.catalog.differences {
            let values = Self::subtract(
                Self::column(base, &diff.minuend)?,
                Self::column(base, &diff.subtrahend)?,
            );
            out = out.with_column(diff.name.clone(), values)?;
        }

        for (group, average) in self.catalog.groups.iter().zip(&averages) {
            if !group.deviations {
                continue;
            }
            for member in &group.members {
                let values = Self::subtract(Self::column(base, &member.column)?, average);
                out = out.with_column(group.deviation_name(member), values)?;
            }
        }

        info!(
            "Derived {} expert features over {} rows",
            out.width(),
            out.len()
        );

        Ok(out)
    }

    fn column<'a>(table: &'a Table, name: &str) -> Result<&'a [Option<f64>], FeatureError> {
        table
            .column(name)
            .ok_or_else(|| FeatureError::SchemaMismatch(vec![name.to_string()]))
    }

    fn subtract(minuend: &[Option<f64>], subtrahend: &[Option<f64>]) -> Vec<Option<f64>> {
        minuend
            .iter()
            .zip(subtrahend)
            .map(|(a, b)| stats::difference(*a, *b))
            .collect()
    }
}

impl Default for FeatureDeriver {
    fn default() -> Self {
        Self::new(FeatureCatalog::default())
    }
}
