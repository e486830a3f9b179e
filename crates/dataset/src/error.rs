use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read price file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("The price file has no header row.")]
    MissingHeader,

    #[error(transparent)]
    Core(#[from] core_types::CoreError),
}
