//! # Analytics Engine
//!
//! Descriptive statistics over date-indexed price tables: returns, trailing
//! moving statistics, outlier detection and additive seasonal decomposition.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O. Inputs are `core-types` tables, outputs are plain
//!   serializable structs that any rendering layer can consume.
//! - **Stateless Calculation:** Every transform is a function of its inputs. The
//!   `AnalyticsEngine` only binds a parameter set; results such as the
//!   `ReturnSeries` are threaded between calls by the caller.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: applies a configured parameter set to a table.
//! - `compute_returns`, `rolling_statistics`, `detect_zscore_outliers`,
//!   `detect_quantile_outliers`, `seasonal_decompose`: the individual transforms.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod decomposition;
pub mod engine;
pub mod error;
pub mod outliers;
pub mod report;
pub mod returns;
pub mod rolling;
pub mod stats;

#[cfg(test)]
mod test_support;

// Re-export the key components to create a clean, public-facing API.
pub use decomposition::{decompose_additive, seasonal_decompose, DecompositionResult};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use outliers::{
    detect_quantile_outliers, detect_zscore_outliers, ColumnTailOutliers, ColumnZScoreOutliers,
    FlaggedReturn, QuantileOutliers, ZScoreOutlier, ZScoreOutliers,
};
pub use report::{summarize, ColumnSummary, TableAnalysis};
pub use returns::{append_returns_column, compute_returns, pct_change, ReturnSeries};
pub use rolling::{rolling_statistics, RollingWindowResult, ROLLING_MEAN, ROLLING_STD};
