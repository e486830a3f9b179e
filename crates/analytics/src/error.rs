use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {required} observations required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("Series '{ticker}' has a missing observation at row {row}")]
    MissingObservation { ticker: String, row: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
