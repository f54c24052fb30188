//! Pipeline Runner

use crate::{PipelineConfig, PipelineError};
use fault_labels::{LabelBuilder, LabelSeries, StatusEvent};
use feature_engine::{FeatureDeriver, LagBuilder, RowSummary, WindowAggregator};
use scada_cleaner::Cleaner;
use scada_ingest::{load_sources, RawSources, ScadaReader, StatusRecord};
use serde::{Deserialize, Serialize};
use storage::{FileStore, Store};
use timeseries::{Join, Table};
use tracing::{debug, info, warn};

/// Names of persisted artifacts
pub mod artifacts {
    pub const SCADA_DATA: &str = "scada_data";
    pub const STATUS_DATA_WEC: &str = "status_data_wec";
    pub const STATUS_DATA_RTU: &str = "status_data_rtu";
    pub const WARNING_DATA_WEC: &str = "warning_data_wec";
    pub const WARNING_DATA_RTU: &str = "warning_data_rtu";
    pub const EXPERT_FEATURES: &str = "expert_features";
    pub const MEAN_STD: &str = "mean_std";
    pub const LAGGED_FEATURES: &str = "lagged_features";
    pub const FEATURE_MATRIX: &str = "xdata_all_unscaled";
    pub const LABELS: &str = "ylabels";
}

/// Final model input: features and one label per row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub features: Table,
    pub labels: LabelSeries,
}

struct StageOutputs {
    expert: Table,
    mean_std: Table,
    lagged: Table,
}

/// Batch pipeline over one turbine dataset
pub struct Pipeline<S: Store> {
    config: PipelineConfig,
    store: S,
}

impl Pipeline<FileStore> {
    /// Pipeline persisting to the configured store directory
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        let store = FileStore::open(&config.store_dir)?;
        Ok(Self::new(config, store))
    }
}

impl<S: Store> Pipeline<S> {
    pub fn new(config: PipelineConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run every stage and persist the results
    pub fn run(&self) -> Result<FeatureMatrix, PipelineError> {
        if self.config.resume {
            return self.resume();
        }

        let reader = ScadaReader::new(self.config.utc_offset_hours);
        let raw = load_sources(&reader, &self.config.inputs)?;

        let summarised = RowSummary::default().append_to(raw.scada.clone())?;
        let scada = Cleaner::new(self.config.cleaner.clone()).clean(&summarised)?;

        let (expert, window, lagged) = self.feature_stages(&scada);
        let stages = StageOutputs {
            expert: expert?,
            mean_std: window?,
            lagged: lagged?,
        };

        let matrix = self.finish(&scada, &stages, &raw.status_wec)?;
        self.persist_sources(&scada, &raw)?;
        self.persist_stages(&stages)?;
        self.persist_matrix(&matrix)?;
        Ok(matrix)
    }

    /// Rebuild lags, assembly and labels from stored intermediate artifacts
    pub fn resume(&self) -> Result<FeatureMatrix, PipelineError> {
        info!("Resuming from stored artifacts");
        let scada: Table = self.store.load(artifacts::SCADA_DATA)?;
        let expert: Table = self.store.load(artifacts::EXPERT_FEATURES)?;
        let mean_std: Table = self.store.load(artifacts::MEAN_STD)?;
        let status: Vec<StatusRecord> = self.store.load(artifacts::STATUS_DATA_WEC)?;

        let lagged = LagBuilder::new(self.config.lags)?.build(&scada)?;
        let stages = StageOutputs {
            expert,
            mean_std,
            lagged,
        };

        let matrix = self.finish(&scada, &stages, &status)?;
        self.store.save(artifacts::LAGGED_FEATURES, &stages.lagged)?;
        self.persist_matrix(&matrix)?;
        Ok(matrix)
    }

    /// Inner-join the base table with every feature table and drop any row
    /// holding a missing value
    pub fn assemble(
        base: &Table,
        expert: &Table,
        lagged: &Table,
        mean_std: &Table,
    ) -> Result<Table, PipelineError> {
        let joined = Table::concat(&[base, expert, lagged, mean_std], Join::Inner)?;
        let complete = joined.drop_missing();

        info!(
            "Assembled feature matrix: {} rows x {} columns ({} of {} base rows dropped)",
            complete.len(),
            complete.width(),
            base.len() - complete.len(),
            base.len()
        );
        if complete.is_empty() && !base.is_empty() {
            warn!("Every row was dropped during assembly");
        }
        Ok(complete)
    }

    fn feature_stages(
        &self,
        scada: &Table,
    ) -> (
        Result<Table, PipelineError>,
        Result<Table, PipelineError>,
        Result<Table, PipelineError>,
    ) {
        let window_config = self.config.window;
        let lag_config = self.config.lags;

        let expert = || -> Result<Table, PipelineError> {
            Ok(FeatureDeriver::default().derive(scada)?)
        };
        let window = || -> Result<Table, PipelineError> {
            Ok(WindowAggregator::new(window_config)?.aggregate(scada)?)
        };
        let lagged = || -> Result<Table, PipelineError> {
            Ok(LagBuilder::new(lag_config)?.build(scada)?)
        };

        if self.config.parallel {
            debug!("Running feature stages in parallel");
            let (expert, (window, lagged)) = rayon::join(expert, || rayon::join(window, lagged));
            (expert, window, lagged)
        } else {
            (expert(), window(), lagged())
        }
    }

    fn finish(
        &self,
        scada: &Table,
        stages: &StageOutputs,
        status: &[StatusRecord],
    ) -> Result<FeatureMatrix, PipelineError> {
        let features = Self::assemble(scada, &stages.expert, &stages.lagged, &stages.mean_std)?;

        let events: Vec<StatusEvent> = status.iter().map(StatusRecord::event).collect();
        let labels = LabelBuilder::new(self.config.labels.clone())
            .build(scada.index(), &events)
            .align_to(features.index())?;

        info!("Final label distribution: {:?}", labels.counts());
        Ok(FeatureMatrix { features, labels })
    }

    fn persist_sources(&self, scada: &Table, raw: &RawSources) -> Result<(), PipelineError> {
        self.store.save(artifacts::SCADA_DATA, scada)?;
        self.store.save(artifacts::STATUS_DATA_WEC, &raw.status_wec)?;
        self.store.save(artifacts::STATUS_DATA_RTU, &raw.status_rtu)?;
        self.store.save(artifacts::WARNING_DATA_WEC, &raw.warning_wec)?;
        self.store.save(artifacts::WARNING_DATA_RTU, &raw.warning_rtu)?;
        Ok(())
    }

    fn persist_stages(&self, stages: &StageOutputs) -> Result<(), PipelineError> {
        self.store.save(artifacts::EXPERT_FEATURES, &stages.expert)?;
        self.store.save(artifacts::MEAN_STD, &stages.mean_std)?;
        self.store.save(artifacts::LAGGED_FEATURES, &stages.lagged)?;
        Ok(())
    }

    fn persist_matrix(&self, matrix: &FeatureMatrix) -> Result<(), PipelineError> {
        self.store.save(artifacts::FEATURE_MATRIX, &matrix.features)?;
        self.store.save(artifacts::LABELS, &matrix.labels)?;
        info!("Persisted feature matrix and labels");
        Ok(())
    }
}
