//! SCADA Ingest
//!
//! Reads the five source files of a turbine dataset: the telemetry table plus
//! WEC and RTU status and warning logs. Every timestamp is shifted from the
//! recording time zone onto the UTC-equivalent timeline.

mod error;
mod reader;
mod records;
mod sources;

pub use error::IngestError;
pub use reader::{ScadaReader, TIME_COLUMN, TIME_FORMAT};
pub use records::{StatusRecord, WarningRecord};
pub use sources::{load_sources, RawSources, SourceFiles};
