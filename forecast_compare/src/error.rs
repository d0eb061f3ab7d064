//! Error types for the forecast_compare crate

use forecast_math::MathError;
use thiserror::Error;

/// Custom error types for the forecast_compare crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A designated column is not present in the upload
    #[error("Column '{0}' not found in uploaded data")]
    MissingColumn(String),

    /// Nothing usable remained after cleaning
    #[error("No usable observations after cleaning the data")]
    EmptyData,

    /// Horizon is not a positive integer
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(String),

    /// Unknown model selector
    #[error("Invalid model selected: {0}")]
    InvalidModel(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// A model could not be fitted or could not forecast
    #[error("{model} failed: {source}")]
    Model {
        model: &'static str,
        #[source]
        source: MathError,
    },

    /// Error related to chart rendering
    #[error("Chart error: {0}")]
    ChartError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from reading or writing the export table
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<polars::prelude::PolarsError> for ForecastError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl ForecastError {
    /// Whether the error was caused by the request rather than the service
    pub fn is_client_error(&self) -> bool {
        match self {
            ForecastError::DataError(_)
            | ForecastError::MissingColumn(_)
            | ForecastError::EmptyData
            | ForecastError::InvalidHorizon(_)
            | ForecastError::InvalidModel(_)
            | ForecastError::PolarsError(_) => true,
            ForecastError::Model { source, .. } => matches!(
                source,
                MathError::InsufficientData(_) | MathError::InvalidInput(_)
            ),
            ForecastError::ForecastingError(_)
            | ForecastError::ChartError(_)
            | ForecastError::IoError(_)
            | ForecastError::CsvError(_) => false,
        }
    }
}
