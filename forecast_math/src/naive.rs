//! Naive persistence forecasting

use crate::{check_finite, Forecaster, MathError, Result};

/// Repeats the last observed value for every future period
#[derive(Debug, Clone, Default)]
pub struct Naive {
    last_value: Option<f64>,
    fitted: Option<Vec<f64>>,
}

impl Naive {
    /// Create an unfitted naive model
    pub fn new() -> Self {
        Self::default()
    }

    /// The value being carried forward
    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }
}

impl Forecaster for Naive {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        check_finite(data)?;

        // One-step-ahead predictions: each point predicts the next
        let mut fitted = Vec::with_capacity(data.len());
        fitted.push(data[0]);
        fitted.extend_from_slice(&data[..data.len() - 1]);

        self.last_value = data.last().copied();
        self.fitted = Some(fitted);
        Ok(())
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let last = self.last_value.ok_or(MathError::NotFitted)?;
        Ok(vec![last; horizon])
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    /// Scored by repeating the final value over the trailing window
    fn backtest(&self, window: usize) -> Option<Vec<f64>> {
        let fitted = self.fitted.as_ref()?;
        if window > fitted.len() {
            return None;
        }
        self.last_value.map(|last| vec![last; window])
    }

    fn name(&self) -> &str {
        "Naive"
    }
}
