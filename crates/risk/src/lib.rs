//! # Risk Metrics
//!
//! Tail-risk and reward/risk statistics of a single ticker's returns.

use analytics::ReturnSeries;

pub mod error;
pub mod historical;

pub use error::RiskError;
pub use historical::{expected_shortfall, sharpe_ratio, value_at_risk, HistoricalRiskModel, RiskReport};

/// A model that turns one ticker's returns into a `RiskReport`.
pub trait RiskModel {
    fn assess(&self, returns: &ReturnSeries, ticker: &str) -> Result<RiskReport, RiskError>;

    /// Assesses every ticker of the series, stopping at the first failure.
    fn assess_all(&self, returns: &ReturnSeries) -> Result<Vec<RiskReport>, RiskError> {
        returns
            .tickers()
            .into_iter()
            .map(|ticker| self.assess(returns, ticker))
            .collect()
    }

    /// Assesses every ticker that has enough returns.
    ///
    /// Tickers that are too short are skipped with a warning. Any other failure
    /// is returned.
    fn assess_available(&self, returns: &ReturnSeries) -> Result<Vec<RiskReport>, RiskError> {
        let mut reports = Vec::new();
        for ticker in returns.tickers() {
            match self.assess(returns, ticker) {
                Ok(report) => reports.push(report),
                Err(RiskError::InsufficientData { ticker, available }) => {
                    tracing::warn!(%ticker, available, "Skipping ticker with too few returns.");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(reports)
    }
}
