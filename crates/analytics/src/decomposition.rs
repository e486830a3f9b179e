use crate::error::AnalyticsError;
use crate::stats;
use chrono::{DateTime, Utc};
use core_types::PriceTable;
use serde::Serialize;

/// Additive components of one series: `observed = trend + seasonal + residual`.
///
/// `trend` and `residual` are undefined for the first and last `period / 2` rows.
/// `seasonal` repeats with the period and is defined everywhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompositionResult {
    pub ticker: String,
    pub period: usize,
    pub index: Vec<DateTime<Utc>>,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

/// The bare components, without index or labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

/// Centered moving average of length `period`.
///
/// An even period has no middle element, so it is centered as a 2 x `period`
/// average: `period + 1` points with half weight on the two ends.
fn centered_moving_average(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = data.len();
    let half = period / 2;
    let p = period as f64;

    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let window = &data[i - half..=i + half];
            let sum: f64 = if period % 2 == 0 {
                let inner: f64 = window[1..window.len() - 1].iter().sum();
                inner + 0.5 * (window[0] + window[window.len() - 1])
            } else {
                window.iter().sum()
            };
            Some(sum / p)
        })
        .collect()
}

/// Splits `data` additively into trend, seasonal and residual components.
///
/// Requires `period >= 2` and at least two full periods of data.
pub fn decompose_additive(data: &[f64], period: usize) -> Result<Components, AnalyticsError> {
    if period < 2 {
        return Err(AnalyticsError::InvalidParameters(format!(
            "seasonal period must be at least 2, got {}",
            period
        )));
    }
    let required = period.saturating_mul(2);
    if data.len() < required {
        return Err(AnalyticsError::InsufficientData {
            required,
            available: data.len(),
        });
    }

    let trend = centered_moving_average(data, period);

    let detrended: Vec<Option<f64>> = data
        .iter()
        .zip(&trend)
        .map(|(x, t)| t.map(|t| x - t))
        .collect();

    // Average the detrended values at each position within the period.
    let mut period_averages: Vec<f64> = (0..period)
        .map(|pos| {
            let values: Vec<f64> = detrended
                .iter()
                .skip(pos)
                .step_by(period)
                .flatten()
                .copied()
                .collect();
            stats::mean(&values).unwrap_or(0.0)
        })
        .collect();

    // Center so that one full cycle of the seasonal component sums to zero.
    let offset = stats::mean(&period_averages).unwrap_or(0.0);
    for avg in &mut period_averages {
        *avg -= offset;
    }

    let seasonal: Vec<f64> = (0..data.len()).map(|i| period_averages[i % period]).collect();

    let residual = data
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((x, t), s)| t.map(|t| x - t - s))
        .collect();

    Ok(Components {
        trend,
        seasonal,
        residual,
    })
}

/// The Seasonal Decomposer for one ticker of a price table.
///
/// The series must have no missing observations.
pub fn seasonal_decompose(
    table: &PriceTable,
    ticker: &str,
    period: usize,
) -> Result<DecompositionResult, AnalyticsError> {
    let column = table.column(ticker)?;
    let required = period.saturating_mul(2);
    if column.values.len() < required {
        return Err(AnalyticsError::InsufficientData {
            required,
            available: column.values.len(),
        });
    }
    let observed = column
        .dense()
        .map_err(|row| AnalyticsError::MissingObservation {
            ticker: ticker.to_string(),
            row,
        })?;

    let Components {
        trend,
        seasonal,
        residual,
    } = decompose_additive(&observed, period)?;

    tracing::debug!(ticker, period, rows = observed.len(), "Decomposed series.");

    Ok(DecompositionResult {
        ticker: ticker.to_string(),
        period,
        index: table.index().to_vec(),
        observed,
        trend,
        seasonal,
        residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{defined, table};

    /// Linear trend plus a repeating pattern of length `period`.
    fn synthetic(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 0.5 * i as f64 + ((i % period) as f64 - 1.5))
            .collect()
    }

    #[test]
    fn edges_are_undefined_for_even_and_odd_periods() {
        for period in [4usize, 5] {
            let data = synthetic(40, period);
            let c = decompose_additive(&data, period).unwrap();
            let half = period / 2;

            assert!(c.trend[..half].iter().all(Option::is_none));
            assert!(c.trend[40 - half..].iter().all(Option::is_none));
            assert!(c.trend[half..40 - half].iter().all(Option::is_some));
            assert_eq!(
                c.residual.iter().filter(|r| r.is_none()).count(),
                2 * half
            );
        }
    }

    #[test]
    fn components_reconstruct_the_observed_series() {
        let data: Vec<f64> = (0..60)
            .map(|i| 50.0 + (i as f64 * 0.7).sin() * 3.0 + i as f64 * 0.1)
            .collect();
        let c = decompose_additive(&data, 12).unwrap();

        for i in 0..data.len() {
            if let (Some(t), Some(r)) = (c.trend[i], c.residual[i]) {
                assert!((t + c.seasonal[i] + r - data[i]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn recovers_a_clean_linear_trend_and_pattern() {
        let period = 4;
        let data = synthetic(40, period);
        let c = decompose_additive(&data, period).unwrap();

        // The pattern (-1.5, -0.5, 0.5, 1.5) already sums to zero.
        for i in 0..period {
            assert!((c.seasonal[i] - (i as f64 - 1.5)).abs() < 1e-9);
        }
        for i in 2..38 {
            assert!((c.trend[i].unwrap() - (100.0 + 0.5 * i as f64)).abs() < 1e-9);
            assert!(c.residual[i].unwrap().abs() < 1e-9);
        }
    }

    #[test]
    fn seasonal_component_repeats_and_sums_to_zero() {
        let data: Vec<f64> = (0..30).map(|i| ((i * 7) % 11) as f64).collect();
        let c = decompose_additive(&data, 5).unwrap();

        for i in 5..30 {
            assert!((c.seasonal[i] - c.seasonal[i - 5]).abs() < 1e-12);
        }
        assert!(c.seasonal[..5].iter().sum::<f64>().abs() < 1e-9);
    }

    #[test]
    fn needs_two_full_periods() {
        let data = synthetic(9, 5);
        assert_eq!(
            decompose_additive(&data, 5),
            Err(AnalyticsError::InsufficientData {
                required: 10,
                available: 9
            })
        );
        assert!(matches!(
            decompose_additive(&data, 1),
            Err(AnalyticsError::InvalidParameters(_))
        ));
    }

    #[test]
    fn huge_period_is_insufficient_not_an_overflow() {
        let data = synthetic(40, 4);
        assert_eq!(
            decompose_additive(&data, usize::MAX),
            Err(AnalyticsError::InsufficientData {
                required: usize::MAX,
                available: 40
            })
        );

        let t = table(vec![("SPY", defined(&data))]);
        assert_eq!(
            seasonal_decompose(&t, "SPY", usize::MAX / 2 + 1),
            Err(AnalyticsError::InsufficientData {
                required: usize::MAX,
                available: 40
            })
        );
    }

    #[test]
    fn table_decomposition_checks_ticker_and_gaps() {
        let mut values = defined(&synthetic(20, 4));
        let t = table(vec![("SPY", values.clone())]);

        let result = seasonal_decompose(&t, "SPY", 4).unwrap();
        assert_eq!(result.index, t.index());
        assert_eq!(result.observed.len(), 20);

        assert!(matches!(
            seasonal_decompose(&t, "TSLA", 4),
            Err(AnalyticsError::Core(_))
        ));

        values[3] = None;
        let gappy = table(vec![("SPY", values)]);
        assert_eq!(
            seasonal_decompose(&gappy, "SPY", 4),
            Err(AnalyticsError::MissingObservation {
                ticker: "SPY".to_string(),
                row: 3
            })
        );
    }
}
