use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A table exactly as read from its source: a header row and text cells.
///
/// No column is interpreted yet. The Time Indexer turns this into a `PriceTable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl RawTable {
    /// Creates a raw table, rejecting records whose width differs from the header.
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Result<Self, CoreError> {
        if let Some((row, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != headers.len())
        {
            return Err(CoreError::Schema(format!(
                "record {} has {} fields but the header has {}",
                row,
                record.len(),
                headers.len()
            )));
        }

        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Splits the table into its header and records.
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.headers, self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_record_is_a_schema_error() {
        let headers = vec!["Date".to_string(), "SPY".to_string()];
        let records = vec![vec!["2024-01-02".to_string()]];

        let err = RawTable::new(headers, records).unwrap_err();
        assert!(matches!(err, CoreError::Schema(_)));
    }

    #[test]
    fn keeps_headers_and_records() {
        let headers = vec!["Date".to_string(), "SPY".to_string()];
        let records = vec![vec!["2024-01-02".to_string(), "470.1".to_string()]];

        let raw = RawTable::new(headers.clone(), records).unwrap();
        assert_eq!(raw.headers(), headers.as_slice());
        assert_eq!(raw.len(), 1);
        assert!(!raw.is_empty());
    }
}
