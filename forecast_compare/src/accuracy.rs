//! Accuracy scoring against the trailing observations

use forecast_math::metrics::mean_absolute_percentage_error;
use forecast_math::Forecaster;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::warn;

/// Accuracy of a model over the trailing window, as a percentage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Accuracy {
    /// `(1 - MAPE) * 100`; unclamped, so it can be negative
    Score(f64),
    /// History too short to hold out the window
    NotAvailable,
}

impl Accuracy {
    /// The numeric score, if available
    pub fn score(&self) -> Option<f64> {
        match self {
            Accuracy::Score(score) => Some(*score),
            Accuracy::NotAvailable => None,
        }
    }

    /// Score from a mean absolute percentage error expressed as a fraction
    pub fn from_mape(mape: f64) -> Self {
        Accuracy::Score((1.0 - mape) * 100.0)
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accuracy::Score(score) => write!(f, "{:.2}%", score),
            Accuracy::NotAvailable => write!(f, "N/A"),
        }
    }
}

impl Serialize for Accuracy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Score a fitted model on the last `window` observations of its history.
///
/// Only available when the history is strictly longer than the window.
pub fn trailing_accuracy(history: &[f64], model: &dyn Forecaster, window: usize) -> Accuracy {
    if window == 0 || history.len() <= window {
        warn!(
            model = model.name(),
            history = history.len(),
            window,
            "History too short to score model"
        );
        return Accuracy::NotAvailable;
    }

    let Some(predicted) = model.backtest(window) else {
        warn!(model = model.name(), "Model has no backtest values");
        return Accuracy::NotAvailable;
    };

    let actual = &history[history.len() - window..];
    match mean_absolute_percentage_error(actual, &predicted) {
        Ok(mape) => Accuracy::from_mape(mape),
        Err(err) => {
            warn!(model = model.name(), error = %err, "Could not score model");
            Accuracy::NotAvailable
        }
    }
}
