use crate::loading::error::LoadError;
use crate::validation::ValidationError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolarError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Unexpected data in column '{column}': {message}")]
    UnexpectedData { column: String, message: String },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Failed to serialize chart data")]
    Serialization(#[from] serde_json::Error),
}
