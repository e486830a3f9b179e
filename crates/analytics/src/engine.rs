use crate::decomposition::{seasonal_decompose, DecompositionResult};
use crate::error::AnalyticsError;
use crate::outliers::{detect_quantile_outliers, detect_zscore_outliers, QuantileOutliers, ZScoreOutliers};
use crate::report::{summarize, TableAnalysis};
use crate::returns::{compute_returns, ReturnSeries};
use crate::rolling::{rolling_statistics, RollingWindowResult};
use configuration::AnalysisConfig;
use core_types::PriceTable;

/// A stateless calculator applying one parameter set to price tables.
///
/// Nothing is cached between calls. Intermediate results such as the returns are
/// passed back in explicitly by the caller.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalysisConfig,
}

impl AnalyticsEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn returns(&self, table: &PriceTable) -> ReturnSeries {
        compute_returns(table)
    }

    pub fn rolling(&self, table: &PriceTable) -> Result<RollingWindowResult, AnalyticsError> {
        rolling_statistics(table, self.config.rolling.window)
    }

    pub fn zscore_outliers(&self, returns: &ReturnSeries) -> ZScoreOutliers {
        detect_zscore_outliers(returns, self.config.outliers.zscore_threshold)
    }

    pub fn quantile_outliers(
        &self,
        returns: &ReturnSeries,
    ) -> Result<QuantileOutliers, AnalyticsError> {
        detect_quantile_outliers(
            returns,
            self.config.outliers.lower_quantile,
            self.config.outliers.upper_quantile,
        )
    }

    pub fn decompose(
        &self,
        table: &PriceTable,
        ticker: &str,
    ) -> Result<DecompositionResult, AnalyticsError> {
        seasonal_decompose(table, ticker, self.config.seasonal.period)
    }

    /// The main entry point: returns, rolling statistics and both outlier sets
    /// for every ticker of the table.
    pub fn analyze(&self, table: &PriceTable) -> Result<TableAnalysis, AnalyticsError> {
        let returns = self.returns(table);
        let rolling = self.rolling(table)?;
        let zscore_outliers = self.zscore_outliers(&returns);
        let quantile_outliers = self.quantile_outliers(&returns)?;
        let return_summary = summarize(returns.frame());

        tracing::info!(
            rows = table.len(),
            tickers = table.columns().len(),
            zscore_outliers = zscore_outliers.total(),
            quantile_outliers = quantile_outliers.total(),
            "Analysis complete."
        );

        Ok(TableAnalysis {
            returns,
            return_summary,
            rolling,
            zscore_outliers,
            quantile_outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{defined, table};

    #[test]
    fn engine_applies_configured_window() {
        let mut config = AnalysisConfig::default();
        config.rolling.window = 3;
        let engine = AnalyticsEngine::new(config);

        let t = table(vec![(
            "A",
            defined(&[100.0, 102.0, 101.0, 105.0, 107.0, 103.0]),
        )]);
        let analysis = engine.analyze(&t).unwrap();

        assert_eq!(analysis.rolling.window, 3);
        let mean = analysis.rolling.rolling_mean.column("A").unwrap();
        assert!((mean.values[2].unwrap() - 101.0).abs() < 1e-12);
        assert_eq!(analysis.return_summary[0].count, 5);
    }

    #[test]
    fn default_window_needs_thirty_rows() {
        let engine = AnalyticsEngine::default();
        let t = table(vec![("A", defined(&[1.0, 2.0, 3.0]))]);
        assert!(matches!(
            engine.analyze(&t),
            Err(AnalyticsError::InsufficientData { required: 30, .. })
        ));
    }
}
