//! Wind Turbine SCADA Feature Pipeline
//!
//! Wires the stages together: ingest, clean, derive features, label, and
//! persist the final feature matrix with its labels.

mod config;
mod error;
mod runner;

pub use self::config::{PipelineConfig, ENV_PREFIX};
pub use error::PipelineError;
pub use runner::{artifacts, FeatureMatrix, Pipeline};

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging; `RUST_LOG` overrides the default `info` level
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    // A subscriber installed by the host application takes precedence
    let _ = tracing::subscriber::set_global_default(subscriber);
}
