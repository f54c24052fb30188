//! Pipeline Configuration

use crate::PipelineError;
use config::{Config, Environment, File};
use fault_labels::LabelConfig;
use feature_engine::{LagConfig, WindowConfig};
use scada_cleaner::CleanerConfig;
use scada_ingest::SourceFiles;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "TURBINE";

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source file paths
    pub inputs: SourceFiles,
    /// Directory for persisted artifacts
    pub store_dir: PathBuf,
    /// Hours subtracted from every source timestamp
    pub utc_offset_hours: i64,
    pub cleaner: CleanerConfig,
    pub window: WindowConfig,
    pub lags: LagConfig,
    pub labels: LabelConfig,
    /// Run the three feature stages concurrently
    pub parallel: bool,
    /// Start from stored intermediate artifacts instead of the source files
    pub resume: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inputs: SourceFiles::default(),
            store_dir: PathBuf::from("artifacts"),
            utc_offset_hours: 1,
            cleaner: CleanerConfig::default(),
            window: WindowConfig::default(),
            lags: LagConfig::default(),
            labels: LabelConfig::default(),
            parallel: true,
            resume: false,
        }
    }
}

impl PipelineConfig {
    /// Load from an optional TOML file, overlaid with `TURBINE__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        let config: PipelineConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.utc_offset_hours, 1);
        assert_eq!(config.lags.lags, 6);
        assert_eq!(config.window.window_minutes, 120);
        assert!(config.parallel);
        assert!(!config.resume);
    }

    #[test]
    fn test_load_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        fs::write(
            &path,
            r#"
store_dir = "out"
parallel = false

[lags]
lags = 3

[labels]
tracked_codes = [80]

[inputs]
scada = "data/scada.csv"
"#,
        )
        .unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.store_dir, PathBuf::from("out"));
        assert!(!config.parallel);
        assert_eq!(config.lags.lags, 3);
        assert_eq!(config.lags.sample_period_minutes, 10);
        assert_eq!(config.labels.tracked_codes, vec![80]);
        assert_eq!(config.inputs.scada, PathBuf::from("data/scada.csv"));
        assert_eq!(config.inputs.status_wec, PathBuf::from("status_data_wec.csv"));
        assert_eq!(config.cleaner.grid_minutes, 10);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = PipelineConfig::load(Some(Path::new("/nonexistent/pipeline.toml")));
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
