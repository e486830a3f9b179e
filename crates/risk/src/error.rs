use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Risk parameters are invalid: {0}")]
    InvalidParameters(String),

    #[error("Not enough returns for '{ticker}': {available} valid observations, at least 2 required")]
    InsufficientData { ticker: String, available: usize },

    #[error(transparent)]
    Schema(#[from] CoreError),
}
