use serde::{Deserialize, Serialize};

/// The root configuration for an analysis session.
///
/// Every section falls back to its defaults when omitted, so an empty file (or no
/// file at all) yields the standard parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data: DataParams,
    pub rolling: RollingParams,
    pub outliers: OutlierParams,
    pub risk: RiskParams,
    pub seasonal: SeasonalParams,
    pub output: OutputFormat,
}

/// How the input table is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataParams {
    /// The column holding the row dates.
    pub date_field: String,
    /// When set, only `<field>_<TICKER>` columns are analysed (e.g. "Close").
    pub price_field: Option<String>,
}

/// Parameters for the trailing moving statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingParams {
    /// Number of observations in each trailing window.
    pub window: usize,
}

/// Parameters for both outlier rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierParams {
    /// Returns with |z| strictly above this are flagged.
    pub zscore_threshold: f64,
    /// Returns strictly below this quantile are flagged as low tail.
    pub lower_quantile: f64,
    /// Returns strictly above this quantile are flagged as high tail.
    pub upper_quantile: f64,
}

/// Parameters for the tail-risk metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    /// The VaR quantile, e.g. 0.05 for a 95% VaR.
    pub confidence: f64,
    /// Used to annualize the reward/risk ratio. 252 trading days for daily data.
    pub periods_per_year: usize,
}

/// Parameters for the additive seasonal decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalParams {
    /// Length of one seasonal cycle in observations.
    pub period: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

// --- Default Implementations ---

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data: DataParams::default(),
            rolling: RollingParams::default(),
            outliers: OutlierParams::default(),
            risk: RiskParams::default(),
            seasonal: SeasonalParams::default(),
            output: OutputFormat::default(),
        }
    }
}

impl Default for DataParams {
    fn default() -> Self {
        Self {
            date_field: "Date".to_string(),
            price_field: None,
        }
    }
}

impl Default for RollingParams {
    fn default() -> Self {
        Self { window: 30 }
    }
}

impl Default for OutlierParams {
    fn default() -> Self {
        Self {
            zscore_threshold: 3.0,
            lower_quantile: 0.01,
            upper_quantile: 0.99,
        }
    }
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            confidence: 0.05,
            periods_per_year: 252,
        }
    }
}

impl Default for SeasonalParams {
    fn default() -> Self {
        Self { period: 252 }
    }
}

impl AnalysisConfig {
    /// Checks that the parameters describe a computable analysis.
    pub fn validate(&self) -> Result<(), String> {
        if self.data.date_field.is_empty() {
            return Err("data.date_field must not be empty".to_string());
        }
        if self.rolling.window == 0 {
            return Err("rolling.window must be at least 1".to_string());
        }
        let o = &self.outliers;
        if !(o.zscore_threshold.is_finite() && o.zscore_threshold > 0.0) {
            return Err("outliers.zscore_threshold must be a positive number".to_string());
        }
        if !(0.0..=1.0).contains(&o.lower_quantile)
            || !(0.0..=1.0).contains(&o.upper_quantile)
            || o.lower_quantile >= o.upper_quantile
        {
            return Err(
                "outliers quantiles must satisfy 0 <= lower_quantile < upper_quantile <= 1"
                    .to_string(),
            );
        }
        if !(self.risk.confidence > 0.0 && self.risk.confidence < 1.0) {
            return Err("risk.confidence must be between 0 and 1".to_string());
        }
        if self.risk.periods_per_year == 0 {
            return Err("risk.periods_per_year must be at least 1".to_string());
        }
        if self.seasonal.period < 2 {
            return Err("seasonal.period must be at least 2".to_string());
        }
        Ok(())
    }
}
