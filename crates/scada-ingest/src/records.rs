//! Status and Warning Log Records

use crate::error::IngestError;
use crate::reader::ScadaReader;
use csv::StringRecord;
use fault_labels::StatusEvent;
use serde::{Deserialize, Serialize};
use timeseries::{stats, Timestamp};

const STATUS_FIELDS: usize = 9;
const WARNING_FIELDS: usize = 7;

/// One row of a WEC or RTU status log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub time: Timestamp,
    pub plant_id: i32,
    pub unit_id: i32,
    pub status_code: String,
    pub description: String,
    pub main_status: i32,
    pub flags: [bool; 2],
    /// Status duration; missing when the log leaves it blank
    pub duration: Option<f64>,
}

impl StatusRecord {
    /// The labelling view of this record
    pub fn event(&self) -> StatusEvent {
        StatusEvent::new(self.time, self.main_status)
    }

    pub(crate) fn parse(
        reader: &ScadaReader,
        row: usize,
        record: &StringRecord,
    ) -> Result<Self, IngestError> {
        expect_fields(row, record, STATUS_FIELDS)?;
        Ok(Self {
            time: reader.parse_timestamp(row, &record[0])?,
            plant_id: parse_int(row, "plant id", &record[1])?,
            unit_id: parse_int(row, "unit id", &record[2])?,
            status_code: record[3].to_string(),
            description: record[4].to_string(),
            main_status: parse_int(row, "main status", &record[5])?,
            flags: [
                parse_bool(row, "flag", &record[6])?,
                parse_bool(row, "flag", &record[7])?,
            ],
            duration: stats::parse_cell(&record[8]),
        })
    }
}

/// One row of a WEC or RTU warning log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningRecord {
    pub time: Timestamp,
    pub plant_id: i32,
    pub unit_id: i32,
    pub status_code: String,
    pub description: String,
    pub flag: bool,
    pub duration: Option<f64>,
}

impl WarningRecord {
    pub(crate) fn parse(
        reader: &ScadaReader,
        row: usize,
        record: &StringRecord,
    ) -> Result<Self, IngestError> {
        expect_fields(row, record, WARNING_FIELDS)?;
        Ok(Self {
            time: reader.parse_timestamp(row, &record[0])?,
            plant_id: parse_int(row, "plant id", &record[1])?,
            unit_id: parse_int(row, "unit id", &record[2])?,
            status_code: record[3].to_string(),
            description: record[4].to_string(),
            flag: parse_bool(row, "flag", &record[5])?,
            duration: stats::parse_cell(&record[6]),
        })
    }
}

fn expect_fields(row: usize, record: &StringRecord, expected: usize) -> Result<(), IngestError> {
    if record.len() != expected {
        return Err(IngestError::FieldCount {
            row,
            expected,
            actual: record.len(),
        });
    }
    Ok(())
}

fn parse_int(row: usize, field: &'static str, value: &str) -> Result<i32, IngestError> {
    value.parse().map_err(|_| IngestError::Field {
        row,
        field,
        value: value.to_string(),
    })
}

fn parse_bool(row: usize, field: &'static str, value: &str) -> Result<bool, IngestError> {
    match value {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" => Ok(false),
        _ => Err(IngestError::Field {
            row,
            field,
            value: value.to_string(),
        }),
    }
}
