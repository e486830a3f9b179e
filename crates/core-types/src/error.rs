use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Failed to parse {field} value '{value}' at row {row}")]
    Parse {
        field: String,
        value: String,
        row: usize,
    },

    #[error("Schema error: {0}")]
    Schema(String),
}
