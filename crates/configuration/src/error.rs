use thiserror::Error;

/// Why the analysis parameters could not be resolved.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The parameter file or an `EDA_*` variable could not be read or deserialized.
    #[error("Cannot read analysis parameters: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Analysis parameters out of range: {0}")]
    InvalidParameters(String),
}
