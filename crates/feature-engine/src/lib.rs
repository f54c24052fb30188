//! Feature Engineering Engine
//!
//! Derives model features from a cleaned observation table:
//! - same-timestamp averages and differences (`derive`)
//! - trailing-window mean and standard deviation (`window`)
//! - lagged copies of every column (`lag`)
//!
//! The three stages only read the base table and can run in any order.

pub mod catalog;
mod derive;
mod error;
mod lag;
mod naming;
mod window;

pub use derive::{Difference, FeatureCatalog, FeatureDeriver, FeatureGroup, GroupMember, RowSummary};
pub use error::FeatureError;
pub use lag::{LagBuilder, LagConfig, DEFAULT_LAGS};
pub use naming::{feature_name, FeatureKind};
pub use window::{WindowAggregator, WindowConfig};
