//! Missing-Aware Summary Statistics
//!
//! Missing cells (`None`) are skipped, matching how the pipeline treats gaps
//! in sensor columns.

/// Arithmetic mean of the present values, `None` when nothing is present
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values.into_iter().flatten() {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sample standard deviation (n - 1 denominator) of the present values.
///
/// Returns `None` with fewer than two present values.
pub fn sample_std<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.into_iter().flatten().collect();
    if present.len() < 2 {
        return None;
    }

    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let m2: f64 = present.iter().map(|v| (v - mean) * (v - mean)).sum();

    Some((m2 / (n - 1.0)).sqrt())
}

/// Signed difference, missing if either operand is missing
pub fn difference(minuend: Option<f64>, subtrahend: Option<f64>) -> Option<f64> {
    Some(minuend? - subtrahend?)
}

/// Parse a numeric cell, mapping blanks and garbage to a missing value
pub fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}
