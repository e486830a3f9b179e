use crate::error::AnalyticsError;
use chrono::{DateTime, Utc};
use core_types::{Column, CoreError, PriceTable, TimeFrame};
use serde::Serialize;

/// Simple period-over-period returns, one column per ticker, aligned to the
/// price table's index. Row 0 of every column is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries(TimeFrame);

impl ReturnSeries {
    pub fn frame(&self) -> &TimeFrame {
        &self.0
    }

    pub fn into_frame(self) -> TimeFrame {
        self.0
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        self.0.index()
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.0.tickers()
    }

    pub fn columns(&self) -> &[Column] {
        self.0.columns()
    }

    pub fn column(&self, ticker: &str) -> Result<&Column, CoreError> {
        self.0.column(ticker)
    }

    /// The defined returns of one ticker, in row order.
    pub fn defined_values(&self, ticker: &str) -> Result<Vec<f64>, CoreError> {
        Ok(self.column(ticker)?.defined_values())
    }
}

/// Percentage change between consecutive observations of one column.
///
/// A return is undefined at row 0, and wherever either price is missing or the
/// earlier price is zero.
pub fn pct_change(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }

    out.push(None);
    out.extend(values.windows(2).map(|w| match (w[0], w[1]) {
        (Some(prev), Some(curr)) if prev != 0.0 => Some((curr - prev) / prev),
        _ => None,
    }));
    out
}

/// The Return Calculator: returns for every column of the table.
pub fn compute_returns(table: &PriceTable) -> ReturnSeries {
    let frame = table.map_columns(|c| pct_change(&c.values));
    tracing::debug!(rows = frame.len(), columns = frame.columns().len(), "Computed returns.");
    ReturnSeries(frame)
}

/// Retains one ticker's returns on the table itself as `<ticker>_return`.
pub fn append_returns_column(table: &mut PriceTable, ticker: &str) -> Result<String, AnalyticsError> {
    let values = pct_change(&table.column(ticker)?.values);
    let name = format!("{}_return", ticker);
    table.append_column(name.clone(), values)?;
    Ok(name)
}
