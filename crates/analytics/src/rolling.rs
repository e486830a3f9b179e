use crate::error::AnalyticsError;
use crate::stats;
use core_types::{PriceTable, TimeFrame};
use serde::Serialize;

pub const ROLLING_MEAN: &str = "rolling_mean";
pub const ROLLING_STD: &str = "rolling_std";

/// Trailing moving mean and sample standard deviation of every column.
///
/// Both frames share the input table's index and columns. The first `window - 1`
/// rows of each column are undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingWindowResult {
    pub window: usize,
    pub rolling_mean: TimeFrame,
    pub rolling_std: TimeFrame,
}

impl RollingWindowResult {
    /// Looks up one of the two series by name (`rolling_mean` or `rolling_std`).
    pub fn get(&self, name: &str) -> Option<&TimeFrame> {
        match name {
            ROLLING_MEAN => Some(&self.rolling_mean),
            ROLLING_STD => Some(&self.rolling_std),
            _ => None,
        }
    }
}

/// Applies `stat` to each complete trailing window of `values`.
///
/// A row is undefined until `window` observations exist, and also whenever the
/// window ending there contains a missing observation.
fn trailing<F>(values: &[Option<f64>], window: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut buf = Vec::with_capacity(window);
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            buf.clear();
            for v in &values[i + 1 - window..=i] {
                buf.push((*v)?);
            }
            stat(&buf)
        })
        .collect()
}

pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    trailing(values, window, stats::mean)
}

/// With a window of one the sample deviation is undefined on every row.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    trailing(values, window, stats::sample_std)
}

/// The Rolling Statistics transform over a whole table.
///
/// Fails with `InsufficientData` when the table is shorter than one window,
/// since no row could ever be defined.
pub fn rolling_statistics(
    table: &PriceTable,
    window: usize,
) -> Result<RollingWindowResult, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidParameters(
            "rolling window must be at least 1".to_string(),
        ));
    }
    if table.len() < window {
        return Err(AnalyticsError::InsufficientData {
            required: window,
            available: table.len(),
        });
    }

    let result = RollingWindowResult {
        window,
        rolling_mean: table.map_columns(|c| rolling_mean(&c.values, window)),
        rolling_std: table.map_columns(|c| rolling_std(&c.values, window)),
    };

    tracing::debug!(window, columns = table.columns().len(), "Computed rolling statistics.");
    Ok(result)
}
