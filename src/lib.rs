//! # Forecast Workspace
//!
//! Monthly forecast comparison: upload a table of dated values, forecast it
//! with Holt-Winters, ARIMA(5,1,0) and a naive model, and compare them.
//!
//! The work is split across three crates:
//!
//! - [`math`] (`forecast_math`): the models, the optimiser and the error metrics
//! - [`compare`] (`forecast_compare`): data preparation, scoring, charts and export
//! - [`server`] (`forecast_server`): the HTTP front end
//!
//! ## Example
//!
//! ```
//! use forecast_workspace::compare::ModelKind;
//!
//! let kind: ModelKind = "HW".parse().unwrap();
//! assert_eq!(kind, ModelKind::HoltWinters);
//! assert_eq!(kind.label(), "Holt-Winters Forecast");
//! ```

pub use forecast_compare as compare;
pub use forecast_math as math;
pub use forecast_server as server;

/// Fit a model to a series and forecast `horizon` values past its end.
///
/// # Examples
///
/// ```
/// use forecast_workspace::{math::Naive, quick_forecast};
///
/// let forecast = quick_forecast(Naive::new(), &[3.0, 4.0, 5.0], 2).unwrap();
/// assert_eq!(forecast, vec![5.0, 5.0]);
/// ```
pub fn quick_forecast<M: math::Forecaster>(
    mut model: M,
    series: &[f64],
    horizon: usize,
) -> math::Result<Vec<f64>> {
    model.fit(series)?;
    model.forecast(horizon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_forecast_arima() {
        let series: Vec<f64> = (0..20).map(|i| 5.0 + i as f64).collect();
        let model = math::Arima::new(math::ArimaOrder::new(1, 1, 0)).unwrap();

        let forecast = quick_forecast(model, &series, 3).unwrap();
        assert_eq!(forecast.len(), 3);
        assert!((forecast[0] - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_quick_forecast_propagates_errors() {
        assert!(quick_forecast(math::Naive::new(), &[], 1).is_err());
    }
}
