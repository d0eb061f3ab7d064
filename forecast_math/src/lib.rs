//! # Forecast Math
//!
//! Numerical building blocks for univariate forecasting.
//! This crate provides the fitted models used by the forecast comparison
//! service together with the small amount of optimisation and linear
//! algebra they need.

use thiserror::Error;

pub mod arima;
pub mod holt_winters;
pub mod linalg;
pub mod metrics;
pub mod naive;
pub mod optimize;

pub use arima::{Arima, ArimaOrder};
pub use holt_winters::{HoltWinters, SmoothingParams};
pub use naive::Naive;

/// Errors that can occur while fitting or evaluating a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Model must be fitted before forecasting")]
    NotFitted,
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Common interface for the forecasting models
pub trait Forecaster: Send {
    /// Fit the model to the full history
    fn fit(&mut self, data: &[f64]) -> Result<()>;

    /// Forecast `horizon` values past the end of the history
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// In-sample values aligned with the history, once fitted
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Values compared against the last `window` observations when scoring the model.
    ///
    /// Defaults to the trailing fitted values.
    fn backtest(&self, window: usize) -> Option<Vec<f64>> {
        let fitted = self.fitted_values()?;
        if window > fitted.len() {
            return None;
        }
        Some(fitted[fitted.len() - window..].to_vec())
    }

    /// Name of the model
    fn name(&self) -> &str;
}

/// Reject empty or non-finite input before fitting
pub(crate) fn check_finite(data: &[f64]) -> Result<()> {
    if data.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot fit a model to an empty series".to_string(),
        ));
    }

    if let Some(position) = data.iter().position(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Non-finite value at position {}",
            position
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::InsufficientData("need 13 points".to_string());
        assert_eq!(
            err.to_string(),
            "Insufficient data for calculation: need 13 points"
        );
        assert_eq!(
            MathError::NotFitted.to_string(),
            "Model must be fitted before forecasting"
        );
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(&[1.0, 2.0]).is_ok());
        assert!(matches!(
            check_finite(&[]),
            Err(MathError::InsufficientData(_))
        ));
        assert_eq!(
            check_finite(&[1.0, f64::NAN]),
            Err(MathError::InvalidInput(
                "Non-finite value at position 1".to_string()
            ))
        );
    }
}
