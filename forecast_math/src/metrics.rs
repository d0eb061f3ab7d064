//! Error metrics for comparing predictions against observations

use crate::{MathError, Result};
use statrs::statistics::Statistics;

fn check_pair(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot score an empty series".to_string(),
        ));
    }

    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match predicted length ({})",
            actual.len(),
            predicted.len()
        )));
    }

    Ok(())
}

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .mean())
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .mean();
    Ok(mse.sqrt())
}

/// Mean absolute percentage error as a fraction (0.05 means 5%).
///
/// Each denominator is floored at machine epsilon, so a zero actual value
/// produces a very large but finite error instead of a division by zero.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs() / a.abs().max(f64::EPSILON))
        .mean())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_regression_metrics() {
        let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

        assert_abs_diff_eq!(mean_absolute_error(&actual, &predicted).unwrap(), 2.4, epsilon = 1e-12);
        assert_abs_diff_eq!(
            root_mean_squared_error(&actual, &predicted).unwrap(),
            (30.0f64 / 5.0).sqrt(),
            epsilon = 1e-12
        );

        // (0.2 + 0.1 + 0.1 + 0.075 + 0.04) / 5
        assert_abs_diff_eq!(
            mean_absolute_percentage_error(&actual, &predicted).unwrap(),
            0.103,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_perfect_prediction() {
        let actual = vec![1.0, 2.0, 3.0];
        assert_eq!(mean_absolute_percentage_error(&actual, &actual).unwrap(), 0.0);
        assert_eq!(mean_absolute_error(&actual, &actual).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_actual_is_finite() {
        let mape = mean_absolute_percentage_error(&[0.0, 1.0], &[1.0, 1.0]).unwrap();
        assert!(mape.is_finite());
        assert!(mape > 1e10);
    }

    #[test]
    fn test_error_handling() {
        assert!(mean_absolute_error(&[], &[]).is_err());
        assert!(mean_absolute_percentage_error(&[1.0, 2.0], &[1.0]).is_err());
        assert!(root_mean_squared_error(&[1.0], &[1.0, 2.0]).is_err());
    }
}
