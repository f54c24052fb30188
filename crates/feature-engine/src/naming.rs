//! Feature Column Naming

/// Kind of time-dependent feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Value from `param` minutes earlier
    Lag,
    /// Trailing mean over `param` hours
    WindowMean,
    /// Trailing standard deviation over `param` hours
    WindowStd,
}

/// Name of a derived column; depends only on its arguments.
///
/// ```
/// use feature_engine::{feature_name, FeatureKind};
///
/// assert_eq!(feature_name("WEC_ava_Power", FeatureKind::Lag, 20), "WEC_ava_Power_t-20min");
/// assert_eq!(feature_name("WEC_ava_Power", FeatureKind::WindowMean, 2), "2hr_mean_WEC_ava_Power");
/// ```
pub fn feature_name(base: &str, kind: FeatureKind, param: i64) -> String {
    match kind {
        FeatureKind::Lag => format!("{base}_t-{param}min"),
        FeatureKind::WindowMean => format!("{param}hr_mean_{base}"),
        FeatureKind::WindowStd => format!("{param}hr_std_{base}"),
    }
}
