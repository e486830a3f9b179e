use crate::error::RiskError;
use crate::RiskModel;
use analytics::stats;
use analytics::ReturnSeries;
use configuration::RiskParams;
use serde::Serialize;

/// Tail-risk and reward/risk figures for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub ticker: String,
    pub confidence: f64,
    /// Number of defined returns the figures were computed from.
    pub observations: usize,
    /// The `confidence`-quantile of returns. Negative for a loss.
    pub value_at_risk: f64,
    /// Mean of the returns at or below the VaR.
    pub expected_shortfall: f64,
    pub sharpe_ratio: Option<f64>, // Option<> for cases with no stdev
    pub annualized_sharpe_ratio: Option<f64>,
}

/// Historical VaR: the `confidence`-quantile of the returns, linearly interpolated.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> Option<f64> {
    stats::quantile(returns, confidence)
}

/// Average of the returns that are no better than `var`.
pub fn expected_shortfall(returns: &[f64], var: f64) -> Option<f64> {
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var).collect();
    stats::mean(&tail)
}

/// Mean return over its sample standard deviation, with a zero risk-free rate.
///
/// `None` when the deviation is zero or undefined.
pub fn sharpe_ratio(returns: &[f64]) -> Option<f64> {
    let mean = stats::mean(returns)?;
    let std = stats::sample_std(returns)?;
    if std > 0.0 && std.is_finite() {
        Some(mean / std)
    } else {
        None
    }
}

/// Risk figures read directly off the empirical return distribution.
#[derive(Debug, Clone)]
pub struct HistoricalRiskModel {
    params: RiskParams,
}

impl HistoricalRiskModel {
    /// Creates a new `HistoricalRiskModel` with the given configuration parameters.
    pub fn new(params: RiskParams) -> Result<Self, RiskError> {
        // Validate that risk parameters are logical.
        if !(params.confidence > 0.0 && params.confidence < 1.0) {
            return Err(RiskError::InvalidParameters(format!(
                "confidence must be between 0 and 1, got {}",
                params.confidence
            )));
        }
        if params.periods_per_year == 0 {
            return Err(RiskError::InvalidParameters(
                "periods_per_year must be greater than 0".to_string(),
            ));
        }
        Ok(Self { params })
    }
}

impl RiskModel for HistoricalRiskModel {
    fn assess(&self, returns: &ReturnSeries, ticker: &str) -> Result<RiskReport, RiskError> {
        let values = returns.defined_values(ticker)?;
        if values.len() < 2 {
            return Err(RiskError::InsufficientData {
                ticker: ticker.to_string(),
                available: values.len(),
            });
        }

        let confidence = self.params.confidence;
        let var = value_at_risk(&values, confidence).ok_or_else(|| {
            RiskError::InvalidParameters(format!("confidence {} is not a quantile", confidence))
        })?;
        // The VaR itself is always part of the tail, so the tail is never empty.
        let shortfall = expected_shortfall(&values, var).unwrap_or(var);

        let sharpe = sharpe_ratio(&values);
        if sharpe.is_none() {
            tracing::warn!(ticker, "Returns have zero deviation; Sharpe ratio is undefined.");
        }
        let annualized = sharpe.map(|s| s * (self.params.periods_per_year as f64).sqrt());

        tracing::debug!(ticker, var, shortfall, ?sharpe, "Assessed risk.");

        Ok(RiskReport {
            ticker: ticker.to_string(),
            confidence,
            observations: values.len(),
            value_at_risk: var,
            expected_shortfall: shortfall,
            sharpe_ratio: sharpe,
            annualized_sharpe_ratio: annualized,
        })
    }
}
