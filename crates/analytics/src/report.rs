use crate::outliers::{QuantileOutliers, ZScoreOutliers};
use crate::returns::ReturnSeries;
use crate::rolling::RollingWindowResult;
use crate::stats;
use core_types::TimeFrame;
use serde::Serialize;

/// Descriptive statistics of one column's defined values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub ticker: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn from_values(ticker: impl Into<String>, values: &[f64]) -> Self {
        Self {
            ticker: ticker.into(),
            count: values.len(),
            mean: stats::mean(values),
            std: stats::sample_std(values),
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
        }
    }
}

/// Summarizes every column of a frame.
pub fn summarize(frame: &TimeFrame) -> Vec<ColumnSummary> {
    frame
        .columns()
        .iter()
        .map(|c| ColumnSummary::from_values(c.name.clone(), &c.defined_values()))
        .collect()
}

/// Everything the engine derives from one price table.
///
/// The returns are computed once and handed explicitly to both outlier rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableAnalysis {
    pub returns: ReturnSeries,
    pub return_summary: Vec<ColumnSummary>,
    pub rolling: RollingWindowResult,
    pub zscore_outliers: ZScoreOutliers,
    pub quantile_outliers: QuantileOutliers,
}
