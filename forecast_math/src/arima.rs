//! ARIMA(p, d, 0) models estimated by conditional least squares
//!
//! The series is differenced `d` times and an autoregression of order `p`
//! without a constant is fitted to the result. Forecasts are produced on the
//! differenced scale and integrated back onto the original one.

use crate::linalg::solve_least_squares;
use crate::{check_finite, Forecaster, MathError, Result};
use statrs::statistics::Statistics;

/// Ridge penalty keeping degenerate designs (e.g. constant series) solvable
const RIDGE: f64 = 1e-10;

/// ARIMA order (p, d, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    /// Autoregressive terms
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// Moving-average terms
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

/// Fitted coefficients and in-sample state
#[derive(Debug, Clone)]
struct FittedArima {
    coefficients: Vec<f64>,
    history: Vec<f64>,
    differenced: Vec<f64>,
    fitted: Vec<f64>,
    sigma2: f64,
}

/// ARIMA model with autoregressive and differencing terms
#[derive(Debug, Clone)]
pub struct Arima {
    name: String,
    order: ArimaOrder,
    state: Option<FittedArima>,
}

impl Arima {
    /// Create a new model; moving-average terms are not supported
    pub fn new(order: ArimaOrder) -> Result<Self> {
        if order.q > 0 {
            return Err(MathError::InvalidInput(format!(
                "ARIMA({},{},{}): moving-average terms are not supported",
                order.p, order.d, order.q
            )));
        }

        Ok(Self {
            name: format!("ARIMA({},{},{})", order.p, order.d, order.q),
            order,
            state: None,
        })
    }

    /// Model order
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Fitted autoregressive coefficients, lag 1 first
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.coefficients.as_slice())
    }

    /// Residual variance on the differenced scale
    pub fn sigma2(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.sigma2)
    }

    /// Minimum number of observations needed to fit
    pub fn min_observations(&self) -> usize {
        self.order.p + self.order.d + 2
    }

    /// Autoregressive prediction for position `k` of a differenced series,
    /// treating lags before the start as zero.
    fn ar_prediction(coefficients: &[f64], series: &[f64], k: usize) -> f64 {
        coefficients
            .iter()
            .enumerate()
            .filter(|(i, _)| k > *i)
            .map(|(i, phi)| phi * series[k - 1 - i])
            .sum()
    }

    /// Undo differencing for one point: `y_t = w_t + sum_j c_j y_{t-j}`
    fn integrate_point(d: usize, w: f64, levels: &[f64], t: usize) -> f64 {
        w + (1..=d)
            .map(|j| integration_weight(d, j) * levels[t - j])
            .sum::<f64>()
    }
}

/// Difference a series `d` times
pub fn difference(values: &[f64], d: usize) -> Vec<f64> {
    let mut series = values.to_vec();
    for _ in 0..d {
        series = series.windows(2).map(|w| w[1] - w[0]).collect();
    }
    series
}

/// Weight of `y_{t-j}` when undoing `d` differences: `(-1)^(j+1) * C(d, j)`
fn integration_weight(d: usize, j: usize) -> f64 {
    let binomial = (1..=j).fold(1.0, |acc, i| acc * (d + 1 - i) as f64 / i as f64);
    if j % 2 == 1 {
        binomial
    } else {
        -binomial
    }
}

impl Forecaster for Arima {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        check_finite(data)?;

        let ArimaOrder { p, d, .. } = self.order;
        if data.len() < self.min_observations() {
            return Err(MathError::InsufficientData(format!(
                "{} needs at least {} observations, got {}",
                self.name,
                self.min_observations(),
                data.len()
            )));
        }

        let differenced = difference(data, d);

        let coefficients = if p == 0 {
            Vec::new()
        } else {
            let rows: Vec<Vec<f64>> = (p..differenced.len())
                .map(|k| (1..=p).map(|i| differenced[k - i]).collect())
                .collect();
            let targets = &differenced[p..];
            solve_least_squares(&rows, targets, RIDGE)?
        };

        let residuals: Vec<f64> = (p..differenced.len())
            .map(|k| differenced[k] - Self::ar_prediction(&coefficients, &differenced, k))
            .collect();
        let sigma2 = if residuals.is_empty() {
            0.0
        } else {
            residuals.iter().population_variance()
        };

        // One-step-ahead predictions on the original scale
        let fitted: Vec<f64> = (0..data.len())
            .map(|t| {
                if t < d {
                    data[t.saturating_sub(1)]
                } else {
                    let w = Self::ar_prediction(&coefficients, &differenced, t - d);
                    Self::integrate_point(d, w, data, t)
                }
            })
            .collect();

        self.state = Some(FittedArima {
            coefficients,
            history: data.to_vec(),
            differenced,
            fitted,
            sigma2,
        });

        Ok(())
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let state = self.state.as_ref().ok_or(MathError::NotFitted)?;
        let d = self.order.d;

        let mut differenced = state.differenced.clone();
        let mut levels = state.history.clone();
        let n = levels.len();

        for _ in 0..horizon {
            let w = Self::ar_prediction(&state.coefficients, &differenced, differenced.len());
            differenced.push(w);
            let t = levels.len();
            levels.push(Self::integrate_point(d, w, &levels, t));
        }

        Ok(levels.split_off(n))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.fitted.as_slice())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
