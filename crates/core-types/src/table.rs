use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One named numeric column. `None` marks a missing or undefined observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Iterates the defined observations together with their row position.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|x| (i, x)))
    }

    /// Collects the defined observations, dropping the undefined ones.
    pub fn defined_values(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    /// Returns the column's values with every entry required to be defined.
    ///
    /// Yields the position of the first undefined entry on failure.
    pub fn dense(&self) -> Result<Vec<f64>, usize> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| v.ok_or(i))
            .collect()
    }
}

/// A table of named numeric columns keyed by a strictly increasing timestamp index.
///
/// Every column has exactly one value per index entry. Prices, returns and rolling
/// statistics all share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFrame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

/// The caller-owned table of daily closing prices, one column per ticker.
pub type PriceTable = TimeFrame;

impl TimeFrame {
    /// Creates a frame after checking its invariants: a strictly increasing index,
    /// uniquely named columns, and every column as long as the index.
    pub fn new(index: Vec<DateTime<Utc>>, columns: Vec<Column>) -> Result<Self, CoreError> {
        if let Some(w) = index.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CoreError::Schema(format!(
                "index is not strictly increasing at {}",
                w[1]
            )));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(CoreError::Schema(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
            if column.values.len() != index.len() {
                return Err(CoreError::Schema(format!(
                    "column '{}' has {} values but the index has {}",
                    column.name,
                    column.values.len(),
                    index.len()
                )));
            }
        }

        Ok(Self { index, columns })
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The column names in table order.
    pub fn tickers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Looks up a column by name, failing with a schema error if it is absent.
    pub fn column(&self, name: &str) -> Result<&Column, CoreError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::Schema(format!("column '{}' not found", name)))
    }

    /// Builds a frame on the same index from a per-column transform.
    pub fn map_columns<F>(&self, mut f: F) -> TimeFrame
    where
        F: FnMut(&Column) -> Vec<Option<f64>>,
    {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), f(c)))
            .collect();

        TimeFrame {
            index: self.index.clone(),
            columns,
        }
    }

    /// Returns a new frame holding only the named columns, in the order given.
    pub fn select(&self, names: &[&str]) -> Result<TimeFrame, CoreError> {
        let columns = names
            .iter()
            .map(|name| self.column(name).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        TimeFrame::new(self.index.clone(), columns)
    }

    /// Extracts one field of a flattened `<Field>_<TICKER>` layout
    /// (e.g. `Close_TSLA`), renaming each matching column to its bare ticker.
    pub fn select_field(&self, field: &str) -> Result<TimeFrame, CoreError> {
        let prefix = format!("{}_", field);
        let columns: Vec<Column> = self
            .columns
            .iter()
            .filter_map(|c| {
                c.name
                    .strip_prefix(&prefix)
                    .filter(|ticker| !ticker.is_empty())
                    .map(|ticker| Column::new(ticker, c.values.clone()))
            })
            .collect();

        if columns.is_empty() {
            return Err(CoreError::Schema(format!(
                "no columns found for field '{}'",
                field
            )));
        }

        tracing::debug!(field, columns = columns.len(), "Selected field columns.");
        TimeFrame::new(self.index.clone(), columns)
    }

    /// Appends a derived column, e.g. a returns series retained for later reuse.
    pub fn append_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), CoreError> {
        let name = name.into();
        if self.columns.iter().any(|c| c.name == name) {
            return Err(CoreError::Schema(format!("column '{}' already exists", name)));
        }
        if values.len() != self.index.len() {
            return Err(CoreError::Schema(format!(
                "column '{}' has {} values but the index has {}",
                name,
                values.len(),
                self.index.len()
            )));
        }

        self.columns.push(Column::new(name, values));
        Ok(())
    }

    /// Checks that `other` carries exactly the same column names in the same order.
    pub fn ensure_same_columns(&self, other: &TimeFrame) -> Result<(), CoreError> {
        let ours = self.tickers();
        let theirs = other.tickers();
        if ours != theirs {
            return Err(CoreError::Schema(format!(
                "column sets differ: {:?} vs {:?}",
                ours, theirs
            )));
        }
        Ok(())
    }

    /// Appends the rows of a later table with the identical column set.
    ///
    /// Every appended timestamp must come after the last existing one.
    pub fn append_rows(&mut self, other: TimeFrame) -> Result<(), CoreError> {
        self.ensure_same_columns(&other)?;

        if let (Some(last), Some(first)) = (self.index.last(), other.index.first()) {
            if first <= last {
                return Err(CoreError::Schema(format!(
                    "appended rows start at {} which is not after {}",
                    first, last
                )));
            }
        }

        self.index.extend(other.index);
        for (ours, theirs) in self.columns.iter_mut().zip(other.columns) {
            ours.values.extend(theirs.values);
        }
        Ok(())
    }
}
