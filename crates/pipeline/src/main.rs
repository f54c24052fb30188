//! Wind Turbine Feature Pipeline - Main Entry Point

use anyhow::Context;
use pipeline::{init_logging, Pipeline, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Turbine Feature Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = PipelineConfig::load(config_path.as_deref()).context("loading configuration")?;

    let pipeline = Pipeline::from_config(config).context("opening artifact store")?;
    let matrix = pipeline.run().context("pipeline run failed")?;

    info!(
        "Done: {} rows x {} features, labels {:?}",
        matrix.features.len(),
        matrix.features.width(),
        matrix.labels.counts()
    );
    Ok(())
}
