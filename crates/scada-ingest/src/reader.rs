//! CSV Readers

use crate::error::IngestError;
use crate::records::{StatusRecord, WarningRecord};
use chrono::{Duration, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use timeseries::{stats, Table, Timestamp};
use tracing::{debug, info};

/// Name of the timestamp column in every source file
pub const TIME_COLUMN: &str = "Time";

/// Text form of source timestamps
pub const TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Reads source files and corrects their timestamps to UTC-equivalent
#[derive(Debug, Clone, Copy)]
pub struct ScadaReader {
    utc_offset: Duration,
}

impl ScadaReader {
    /// Create a reader for files recorded `utc_offset_hours` ahead of UTC
    pub fn new(utc_offset_hours: i64) -> Self {
        Self {
            utc_offset: Duration::hours(utc_offset_hours),
        }
    }

    /// Offset subtracted from every parsed timestamp
    pub fn utc_offset(&self) -> Duration {
        self.utc_offset
    }

    /// Parse a source timestamp onto the corrected timeline
    pub fn parse_timestamp(&self, row: usize, value: &str) -> Result<Timestamp, IngestError> {
        NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT)
            .map(|ts| ts - self.utc_offset)
            .map_err(|_| IngestError::Timestamp {
                row,
                value: value.to_string(),
            })
    }

    /// Read the telemetry table from a file
    pub fn read_scada(&self, path: impl AsRef<Path>) -> Result<Table, IngestError> {
        let path = path.as_ref();
        info!("Reading telemetry from {}", path.display());
        self.read_scada_from(open(path)?)
    }

    /// Read the telemetry table.
    ///
    /// Rows keep file order; duplicates and off-grid rows are left for the
    /// cleaner. Unparseable numeric cells become missing values.
    pub fn read_scada_from<R: Read>(&self, source: R) -> Result<Table, IngestError> {
        let mut reader = csv_reader(source);
        let headers = reader.headers()?.clone();

        let time_at = headers
            .iter()
            .position(|h| h == TIME_COLUMN)
            .ok_or_else(|| IngestError::MissingColumn(TIME_COLUMN.to_string()))?;
        let names: Vec<&str> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != time_at)
            .map(|(_, name)| name)
            .collect();

        let mut table = Table::new(names.iter().copied());
        let mut unparsed = 0usize;

        for (i, result) in reader.records().enumerate() {
            let row = i + 1;
            let record = result?;
            let timestamp = self.parse_timestamp(row, field(&record, time_at))?;

            let values: Vec<Option<f64>> = record
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != time_at)
                .map(|(_, cell)| {
                    let value = stats::parse_cell(cell);
                    if value.is_none() && !cell.is_empty() {
                        unparsed += 1;
                    }
                    value
                })
                .collect();
            table.push_row(timestamp, values)?;
        }

        if unparsed > 0 {
            debug!("{} non-numeric telemetry cells read as missing", unparsed);
        }
        info!(
            "Read {} telemetry rows with {} columns",
            table.len(),
            table.width()
        );
        Ok(table)
    }

    /// Read a status log from a file
    pub fn read_status_log(&self, path: impl AsRef<Path>) -> Result<Vec<StatusRecord>, IngestError> {
        let path = path.as_ref();
        let records = self.read_status_log_from(open(path)?)?;
        info!("Read {} status entries from {}", records.len(), path.display());
        Ok(records)
    }

    /// Read a status log; fields are positional
    pub fn read_status_log_from<R: Read>(&self, source: R) -> Result<Vec<StatusRecord>, IngestError> {
        csv_reader(source)
            .records()
            .enumerate()
            .map(|(i, result)| StatusRecord::parse(self, i + 1, &result?))
            .collect()
    }

    /// Read a warning log from a file
    pub fn read_warning_log(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<WarningRecord>, IngestError> {
        let path = path.as_ref();
        let records = self.read_warning_log_from(open(path)?)?;
        info!("Read {} warning entries from {}", records.len(), path.display());
        Ok(records)
    }

    /// Read a warning log; fields are positional
    pub fn read_warning_log_from<R: Read>(
        &self,
        source: R,
    ) -> Result<Vec<WarningRecord>, IngestError> {
        csv_reader(source)
            .records()
            .enumerate()
            .map(|(i, result)| WarningRecord::parse(self, i + 1, &result?))
            .collect()
    }
}

impl Default for ScadaReader {
    fn default() -> Self {
        Self::new(1)
    }
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(source)
}

fn field(record: &StringRecord, at: usize) -> &str {
    record.get(at).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SCADA: &str = "\
Time,WEC_ava_windspeed,CS101__Ambient_temp
01/05/2014 01:00:00,5.5,12.0
01/05/2014 01:10:00,,12.5
01/05/2014 01:10:00,6.0,bad
";

    fn at(h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2014, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_scada_columns_and_offset() {
        let table = ScadaReader::default().read_scada_from(SCADA.as_bytes()).unwrap();

        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["WEC_ava_windspeed", "CS101__Ambient_temp"]
        );
        assert_eq!(table.index()[0], at(0, 0));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_scada_missing_cells() {
        let table = ScadaReader::default().read_scada_from(SCADA.as_bytes()).unwrap();

        assert_eq!(table.value(1, "WEC_ava_windspeed"), None);
        assert_eq!(table.value(2, "CS101__Ambient_temp"), None);
        assert_eq!(table.value(2, "WEC_ava_windspeed"), Some(6.0));
    }

    #[test]
    fn test_scada_keeps_duplicates() {
        let table = ScadaReader::default().read_scada_from(SCADA.as_bytes()).unwrap();
        assert_eq!(table.duplicate_timestamps(), vec![at(0, 10)]);
    }

    #[test]
    fn test_configurable_offset() {
        let table = ScadaReader::new(0).read_scada_from(SCADA.as_bytes()).unwrap();
        assert_eq!(table.index()[0], at(1, 0));
    }

    #[test]
    fn test_missing_time_column() {
        let err = ScadaReader::default()
            .read_scada_from("Stamp,a\n01/05/2014 01:00:00,1\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(name) if name == TIME_COLUMN));
    }

    #[test]
    fn test_bad_timestamp_reports_row() {
        let data = "Time,a\n01/05/2014 01:00:00,1\n2014-05-01 01:10,2\n";
        let err = ScadaReader::default().read_scada_from(data.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::Timestamp { row: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ScadaReader::default()
            .read_scada("/nonexistent/scada.csv")
            .unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
