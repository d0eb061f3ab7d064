//! Holt-Winters exponential smoothing with additive trend and additive seasonality
//!
//! Model equations for season length `m`:
//! - Level: `l_t = alpha (y_t - s_{t-m}) + (1 - alpha)(l_{t-1} + b_{t-1})`
//! - Trend: `b_t = beta (l_t - l_{t-1}) + (1 - beta) b_{t-1}`
//! - Seasonal: `s_t = gamma (y_t - l_t) + (1 - gamma) s_{t-m}`
//! - Forecast: `y_{t+h} = l_t + h b_t + s_{t+h-m}`

use crate::optimize::{nelder_mead, NelderMeadOptions};
use crate::{check_finite, Forecaster, MathError, Result};

const PARAM_BOUNDS: (f64, f64) = (1e-4, 0.9999);

/// Smoothing weights for level, trend and season
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl SmoothingParams {
    /// Create a parameter set, each weight strictly between 0 and 1
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(MathError::InvalidInput(format!(
                    "{} must be between 0 and 1 (exclusive), got {}",
                    name, value
                )));
            }
        }

        Ok(Self { alpha, beta, gamma })
    }
}

/// State after running the smoothing recursions over a series
#[derive(Debug, Clone)]
struct Smoothed {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    fitted: Vec<f64>,
    sse: f64,
}

/// Fitted model state
#[derive(Debug, Clone)]
struct FittedState {
    params: SmoothingParams,
    smoothed: Smoothed,
    n: usize,
}

/// Additive Holt-Winters model
#[derive(Debug, Clone)]
pub struct HoltWinters {
    name: String,
    season_length: usize,
    /// Fixed weights; optimised on fit when absent
    fixed: Option<SmoothingParams>,
    state: Option<FittedState>,
}

impl HoltWinters {
    /// Create a model whose smoothing weights are optimised on fit
    pub fn additive(season_length: usize) -> Result<Self> {
        if season_length < 2 {
            return Err(MathError::InvalidInput(
                "Season length must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Holt-Winters(additive, m={})", season_length),
            season_length,
            fixed: None,
            state: None,
        })
    }

    /// Create a model with fixed smoothing weights
    pub fn with_params(season_length: usize, params: SmoothingParams) -> Result<Self> {
        let mut model = Self::additive(season_length)?;
        model.fixed = Some(params);
        Ok(model)
    }

    /// Season length
    pub fn season_length(&self) -> usize {
        self.season_length
    }

    /// Smoothing weights used by the last fit
    pub fn params(&self) -> Option<SmoothingParams> {
        self.state.as_ref().map(|s| s.params)
    }

    /// Final seasonal components, indexed by position within the season
    pub fn seasonals(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.smoothed.seasonals.as_slice())
    }

    /// Final level and trend
    pub fn level_and_trend(&self) -> Option<(f64, f64)> {
        self.state
            .as_ref()
            .map(|s| (s.smoothed.level, s.smoothed.trend))
    }

    /// Minimum number of observations needed to fit
    pub fn min_observations(&self) -> usize {
        self.season_length + 1
    }

    /// Initial level, trend and seasonal components, as of one step before the
    /// first observation.
    ///
    /// The trend is a least squares line over the whole series; each seasonal
    /// component is the mean residual at its position, centred on zero.
    fn initial_state(values: &[f64], m: usize) -> (f64, f64, Vec<f64>) {
        let n = values.len() as f64;
        let t_mean = (n - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let (cov, var) = values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(cov, var), (t, y)| {
                let dt = t as f64 - t_mean;
                (cov + dt * (y - y_mean), var + dt * dt)
            });
        let trend = if var > 0.0 { cov / var } else { 0.0 };
        let intercept = y_mean - trend * t_mean;

        let mut sums = vec![0.0; m];
        let mut counts = vec![0usize; m];
        for (t, y) in values.iter().enumerate() {
            sums[t % m] += y - intercept - trend * t as f64;
            counts[t % m] += 1;
        }
        let mut seasonals: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
            .collect();
        let centre = seasonals.iter().sum::<f64>() / m as f64;
        seasonals.iter_mut().for_each(|s| *s -= centre);

        (intercept - trend, trend, seasonals)
    }

    /// Run the recursions over every observation, recording one-step predictions
    fn smooth(values: &[f64], m: usize, params: SmoothingParams) -> Smoothed {
        let (mut level, mut trend, mut seasonals) = Self::initial_state(values, m);

        let mut fitted = Vec::with_capacity(values.len());
        let mut sse = 0.0;

        for (t, &y) in values.iter().enumerate() {
            let idx = t % m;
            let season = seasonals[idx];
            let prediction = level + trend + season;
            fitted.push(prediction);
            sse += (y - prediction).powi(2);

            let previous_level = level;
            level = params.alpha * (y - season) + (1.0 - params.alpha) * (previous_level + trend);
            trend = params.beta * (level - previous_level) + (1.0 - params.beta) * trend;
            seasonals[idx] = params.gamma * (y - level) + (1.0 - params.gamma) * season;
        }

        Smoothed {
            level,
            trend,
            seasonals,
            fitted,
            sse,
        }
    }

    /// Choose the weights that minimise in-sample one-step squared error
    fn optimise(values: &[f64], m: usize) -> SmoothingParams {
        let result = nelder_mead(
            |p| {
                Self::smooth(
                    values,
                    m,
                    SmoothingParams {
                        alpha: p[0],
                        beta: p[1],
                        gamma: p[2],
                    },
                )
                .sse
            },
            &[0.3, 0.1, 0.1],
            &[PARAM_BOUNDS; 3],
            NelderMeadOptions::default(),
        );

        SmoothingParams {
            alpha: result.point[0],
            beta: result.point[1],
            gamma: result.point[2],
        }
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        check_finite(data)?;

        let m = self.season_length;
        if data.len() < self.min_observations() {
            return Err(MathError::InsufficientData(format!(
                "{} needs at least {} observations, got {}",
                self.name,
                self.min_observations(),
                data.len()
            )));
        }

        let params = match self.fixed {
            Some(params) => params,
            None => Self::optimise(data, m),
        };

        self.state = Some(FittedState {
            params,
            smoothed: Self::smooth(data, m, params),
            n: data.len(),
        });

        Ok(())
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let state = self.state.as_ref().ok_or(MathError::NotFitted)?;
        let m = self.season_length;
        let s = &state.smoothed;

        Ok((1..=horizon)
            .map(|h| s.level + h as f64 * s.trend + s.seasonals[(state.n + h - 1) % m])
            .collect())
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.smoothed.fitted.as_slice())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn seasonal_series(n: usize, trend: f64, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                100.0 + trend * t + amplitude * (2.0 * std::f64::consts::PI * t / 12.0).sin()
            })
            .collect()
    }

    #[test]
    fn test_forecast_length_and_fitted_alignment() {
        let values = seasonal_series(36, 0.5, 10.0);
        let mut model = HoltWinters::additive(12).unwrap();
        model.fit(&values).unwrap();

        assert_eq!(model.forecast(7).unwrap().len(), 7);
        assert_eq!(model.fitted_values().unwrap().len(), 36);

        // One-step predictions follow a clean pattern from the first month on
        for (fitted, actual) in model.fitted_values().unwrap().iter().zip(&values) {
            assert_abs_diff_eq!(*fitted, *actual, epsilon = 6.0);
        }
    }

    #[test]
    fn test_first_season_is_predicted_not_copied() {
        let mut rng = StdRng::seed_from_u64(11);
        let noise = Normal::new(0.0, 5.0).unwrap();
        let values: Vec<f64> = (0..14).map(|_| 50.0 + noise.sample(&mut rng)).collect();

        let mut model = HoltWinters::additive(12).unwrap();
        model.fit(&values).unwrap();

        let fitted = model.fitted_values().unwrap();
        assert_eq!(fitted.len(), 14);
        for (t, (fitted, actual)) in fitted.iter().zip(&values).enumerate().take(12) {
            assert!(
                (fitted - actual).abs() > 1e-9,
                "month {} fitted value equals the observation",
                t
            );
        }
    }

    #[test]
    fn test_initial_state_from_linear_series() {
        let values: Vec<f64> = (0..24).map(|t| 10.0 + 2.0 * t as f64).collect();
        let (level, trend, seasonals) = HoltWinters::initial_state(&values, 12);

        assert_abs_diff_eq!(trend, 2.0, epsilon = 1e-9);
        // One step before the first observation
        assert_abs_diff_eq!(level, 8.0, epsilon = 1e-9);
        assert!(seasonals.iter().all(|s| s.abs() < 1e-9));
    }

    #[test]
    fn test_tracks_clean_seasonal_pattern() {
        let values = seasonal_series(48, 0.5, 10.0);
        let mut model = HoltWinters::additive(12).unwrap();
        model.fit(&values).unwrap();

        let expected = seasonal_series(60, 0.5, 10.0);
        let forecast = model.forecast(12).unwrap();
        for (h, value) in forecast.iter().enumerate() {
            assert_abs_diff_eq!(*value, expected[48 + h], epsilon = 2.0);
        }
    }

    #[test]
    fn test_optimised_params_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = Normal::new(0.0, 2.0).unwrap();
        let values: Vec<f64> = seasonal_series(40, 0.3, 8.0)
            .into_iter()
            .map(|v| v + noise.sample(&mut rng))
            .collect();

        let mut model = HoltWinters::additive(12).unwrap();
        model.fit(&values).unwrap();

        let params = model.params().unwrap();
        for weight in [params.alpha, params.beta, params.gamma] {
            assert!(weight >= PARAM_BOUNDS.0 && weight <= PARAM_BOUNDS.1);
        }
        assert!(model.forecast(6).unwrap().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_fixed_params_are_kept() {
        let params = SmoothingParams::new(0.4, 0.2, 0.3).unwrap();
        let mut model = HoltWinters::with_params(4, params).unwrap();
        model.fit(&[10.0, 20.0, 10.0, 20.0, 11.0, 21.0, 11.0, 21.0]).unwrap();

        assert_eq!(model.params(), Some(params));
        assert_eq!(model.seasonals().unwrap().len(), 4);
    }

    #[test]
    fn test_constant_series() {
        let values = vec![5.0; 24];
        let mut model = HoltWinters::additive(12).unwrap();
        model.fit(&values).unwrap();

        for value in model.forecast(5).unwrap() {
            assert_abs_diff_eq!(value, 5.0, epsilon = 1e-9);
        }
        let (level, trend) = model.level_and_trend().unwrap();
        assert_abs_diff_eq!(level, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(trend, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_minimum_history() {
        let mut model = HoltWinters::additive(12).unwrap();
        assert!(matches!(
            model.fit(&seasonal_series(12, 0.0, 1.0)),
            Err(MathError::InsufficientData(_))
        ));

        // One observation past the first season is enough
        model.fit(&seasonal_series(13, 0.0, 1.0)).unwrap();
        assert_eq!(model.forecast(3).unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(HoltWinters::additive(1).is_err());
        assert!(SmoothingParams::new(0.0, 0.1, 0.1).is_err());
        assert!(SmoothingParams::new(0.5, 1.0, 0.1).is_err());
        assert!(SmoothingParams::new(0.5, 0.1, f64::NAN).is_err());
    }

    #[test]
    fn test_requires_fit() {
        let model = HoltWinters::additive(12).unwrap();
        assert_eq!(model.forecast(1), Err(MathError::NotFitted));
        assert!(model.fitted_values().is_none());
    }
}
