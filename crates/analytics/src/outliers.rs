use crate::error::AnalyticsError;
use crate::returns::ReturnSeries;
use crate::stats;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single flagged return observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedReturn {
    pub timestamp: DateTime<Utc>,
    pub row: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScoreOutlier {
    pub timestamp: DateTime<Utc>,
    pub row: usize,
    pub value: f64,
    pub z_score: f64,
}

/// Z-score outliers of one ticker, with the column-wide moments they were scored by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnZScoreOutliers {
    pub ticker: String,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub outliers: Vec<ZScoreOutlier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScoreOutliers {
    pub threshold: f64,
    pub columns: Vec<ColumnZScoreOutliers>,
}

/// Tail outliers of one ticker: returns beyond its own low and high quantiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnTailOutliers {
    pub ticker: String,
    pub low_cutoff: Option<f64>,
    pub high_cutoff: Option<f64>,
    pub low: Vec<FlaggedReturn>,
    pub high: Vec<FlaggedReturn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileOutliers {
    pub lower_quantile: f64,
    pub upper_quantile: f64,
    pub columns: Vec<ColumnTailOutliers>,
}

impl ZScoreOutliers {
    pub fn for_ticker(&self, ticker: &str) -> Option<&ColumnZScoreOutliers> {
        self.columns.iter().find(|c| c.ticker == ticker)
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.outliers.len()).sum()
    }
}

impl QuantileOutliers {
    pub fn for_ticker(&self, ticker: &str) -> Option<&ColumnTailOutliers> {
        self.columns.iter().find(|c| c.ticker == ticker)
    }

    pub fn total(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.low.len() + c.high.len())
            .sum()
    }
}

/// Flags returns whose z-score, taken against the whole column's mean and sample
/// standard deviation, exceeds `threshold` in magnitude.
///
/// A column with a zero or undefined deviation flags nothing.
pub fn detect_zscore_outliers(returns: &ReturnSeries, threshold: f64) -> ZScoreOutliers {
    let index = returns.index();

    let columns = returns
        .columns()
        .iter()
        .map(|column| {
            let values = column.defined_values();
            let mean = stats::mean(&values);
            let std = stats::sample_std(&values);

            let outliers = match (mean, std) {
                (Some(m), Some(s)) if s > 0.0 && s.is_finite() => column
                    .defined()
                    .filter_map(|(row, value)| {
                        let z_score = (value - m) / s;
                        (z_score.abs() > threshold).then(|| ZScoreOutlier {
                            timestamp: index[row],
                            row,
                            value,
                            z_score,
                        })
                    })
                    .collect(),
                _ => {
                    tracing::warn!(
                        ticker = %column.name,
                        observations = values.len(),
                        "Return deviation is zero or undefined; no z-score outliers flagged."
                    );
                    Vec::new()
                }
            };

            ColumnZScoreOutliers {
                ticker: column.name.clone(),
                mean,
                std,
                outliers,
            }
        })
        .collect();

    ZScoreOutliers { threshold, columns }
}

/// Flags returns strictly below the column's `lower` quantile or strictly above its
/// `upper` quantile. Quantiles use linear interpolation.
///
/// This is a separate rule from the z-score one; the two result sets are never merged.
pub fn detect_quantile_outliers(
    returns: &ReturnSeries,
    lower: f64,
    upper: f64,
) -> Result<QuantileOutliers, AnalyticsError> {
    if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) || lower >= upper {
        return Err(AnalyticsError::InvalidParameters(format!(
            "quantile bounds must satisfy 0 <= lower < upper <= 1, got {} and {}",
            lower, upper
        )));
    }

    let index = returns.index();
    let flag = |row: usize, value: f64| FlaggedReturn {
        timestamp: index[row],
        row,
        value,
    };

    let columns = returns
        .columns()
        .iter()
        .map(|column| {
            let mut sorted = column.defined_values();
            sorted.sort_by(f64::total_cmp);
            let low_cutoff = stats::quantile_sorted(&sorted, lower);
            let high_cutoff = stats::quantile_sorted(&sorted, upper);

            let (low, high) = match (low_cutoff, high_cutoff) {
                (Some(lo), Some(hi)) => (
                    column
                        .defined()
                        .filter(|&(_, v)| v < lo)
                        .map(|(row, v)| flag(row, v))
                        .collect(),
                    column
                        .defined()
                        .filter(|&(_, v)| v > hi)
                        .map(|(row, v)| flag(row, v))
                        .collect(),
                ),
                _ => (Vec::new(), Vec::new()),
            };

            tracing::debug!(
                ticker = %column.name,
                low = low.len(),
                high = high.len(),
                "Flagged tail returns."
            );

            ColumnTailOutliers {
                ticker: column.name.clone(),
                low_cutoff,
                high_cutoff,
                low,
                high,
            }
        })
        .collect();

    Ok(QuantileOutliers {
        lower_quantile: lower,
        upper_quantile: upper,
        columns,
    })
}
