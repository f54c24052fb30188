//! Source File Set

use crate::error::IngestError;
use crate::reader::ScadaReader;
use crate::records::{StatusRecord, WarningRecord};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use timeseries::Table;
use tracing::info;

/// Paths of the five input files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub scada: PathBuf,
    pub status_wec: PathBuf,
    pub status_rtu: PathBuf,
    pub warning_wec: PathBuf,
    pub warning_rtu: PathBuf,
}

impl SourceFiles {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let defaults = Self::default();
        Self {
            scada: dir.join(defaults.scada),
            status_wec: dir.join(defaults.status_wec),
            status_rtu: dir.join(defaults.status_rtu),
            warning_wec: dir.join(defaults.warning_wec),
            warning_rtu: dir.join(defaults.warning_rtu),
        }
    }
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            scada: PathBuf::from("scada_data.csv"),
            status_wec: PathBuf::from("status_data_wec.csv"),
            status_rtu: PathBuf::from("status_data_rtu.csv"),
            warning_wec: PathBuf::from("warning_data_wec.csv"),
            warning_rtu: PathBuf::from("warning_data_rtu.csv"),
        }
    }
}

/// Everything read from one dataset, before cleaning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSources {
    pub scada: Table,
    pub status_wec: Vec<StatusRecord>,
    pub status_rtu: Vec<StatusRecord>,
    pub warning_wec: Vec<WarningRecord>,
    pub warning_rtu: Vec<WarningRecord>,
}

/// Read all five inputs, failing on the first unreadable file
pub fn load_sources(reader: &ScadaReader, files: &SourceFiles) -> Result<RawSources, IngestError> {
    let sources = RawSources {
        scada: reader.read_scada(&files.scada)?,
        status_wec: reader.read_status_log(&files.status_wec)?,
        status_rtu: reader.read_status_log(&files.status_rtu)?,
        warning_wec: reader.read_warning_log(&files.warning_wec)?,
        warning_rtu: reader.read_warning_log(&files.warning_rtu)?,
    };

    info!(
        "Loaded sources: {} telemetry rows, {}+{} status entries, {}+{} warnings",
        sources.scada.len(),
        sources.status_wec.len(),
        sources.status_rtu.len(),
        sources.warning_wec.len(),
        sources.warning_rtu.len()
    );
    Ok(sources)
}
