//! The forecasting models compared for each request

use crate::accuracy::{trailing_accuracy, Accuracy};
use crate::data::ObservationTable;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use forecast_math::{Arima, ArimaOrder, Forecaster, HoltWinters, Naive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Season length for monthly data
pub const SEASON_LENGTH: usize = 12;

/// Order of the ARIMA model
pub const ARIMA_ORDER: ArimaOrder = ArimaOrder { p: 5, d: 1, q: 0 };

/// Model selector
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Additive Holt-Winters exponential smoothing
    HoltWinters,
    /// ARIMA(5,1,0)
    Arima,
    /// Last value carried forward
    Naive,
}

impl ModelKind {
    /// Every model, in comparison order
    pub const ALL: [ModelKind; 3] = [ModelKind::HoltWinters, ModelKind::Arima, ModelKind::Naive];

    /// Selector identifier
    pub fn id(&self) -> &'static str {
        match self {
            ModelKind::HoltWinters => "holtwinters",
            ModelKind::Arima => "arima",
            ModelKind::Naive => "naive",
        }
    }

    /// Human readable label used in charts and pages
    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::HoltWinters => "Holt-Winters Forecast",
            ModelKind::Arima => "ARIMA Forecast",
            ModelKind::Naive => "Naive Forecast",
        }
    }

    /// Build an unfitted model
    pub fn build(&self) -> Result<Box<dyn Forecaster>> {
        let model: Box<dyn Forecaster> = match self {
            ModelKind::HoltWinters => Box::new(HoltWinters::additive(SEASON_LENGTH).map_err(
                |source| ForecastError::Model {
                    model: self.label(),
                    source,
                },
            )?),
            ModelKind::Arima => {
                Box::new(Arima::new(ARIMA_ORDER).map_err(|source| ForecastError::Model {
                    model: self.label(),
                    source,
                })?)
            }
            ModelKind::Naive => Box::new(Naive::new()),
        };

        Ok(model)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "holtwinters" | "exponential-smoothing" | "hw" => Ok(ModelKind::HoltWinters),
            "arima" => Ok(ModelKind::Arima),
            "naive" => Ok(ModelKind::Naive),
            _ => Err(ForecastError::InvalidModel(s.to_string())),
        }
    }
}

/// A single forecasted value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Forecast of one model together with its accuracy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub model: ModelKind,
    pub points: Vec<ForecastPoint>,
    pub accuracy: Accuracy,
}

impl ForecastResult {
    /// Forecasted values without dates
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Fit one model to the table and forecast the given dates
pub fn run_model(
    kind: ModelKind,
    table: &ObservationTable,
    dates: &[NaiveDate],
) -> Result<ForecastResult> {
    let wrap = |source| ForecastError::Model {
        model: kind.label(),
        source,
    };

    let mut model = kind.build()?;
    model.fit(table.values()).map_err(wrap)?;
    let values = model.forecast(dates.len()).map_err(wrap)?;
    let accuracy = trailing_accuracy(table.values(), model.as_ref(), dates.len());

    debug!(
        model = model.name(),
        observations = table.len(),
        horizon = dates.len(),
        %accuracy,
        "Fitted model"
    );

    let points = dates
        .iter()
        .zip(values)
        .map(|(&date, value)| ForecastPoint { date, value })
        .collect();

    Ok(ForecastResult {
        model: kind,
        points,
        accuracy,
    })
}
