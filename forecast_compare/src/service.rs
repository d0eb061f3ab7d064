//! The forecast comparison run

use crate::accuracy::Accuracy;
use crate::calendar::forecast_dates;
use crate::chart::{comparison_chart, selected_chart, ChartRenderer, PngChartRenderer};
use crate::config::ServiceConfig;
use crate::data::{DataLoader, Observation, ObservationTable};
use crate::error::{ForecastError, Result};
use crate::export::{records_from_result, write_forecast_csv, ForecastRecord};
use crate::models::{run_model, ForecastResult, ModelKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// One forecast request
#[derive(Debug, Clone)]
pub struct ForecastRequest {
    /// Raw CSV upload with a header row
    pub csv: Vec<u8>,
    /// Name of the timestamp column
    pub date_column: String,
    /// Name of the value column
    pub value_column: String,
    /// Number of months to forecast; must be positive
    pub periods: i64,
    /// Model selector, e.g. `holtwinters`, `arima` or `naive`
    pub model: String,
}

impl ForecastRequest {
    /// Parse a horizon given as text
    pub fn parse_periods(raw: &str) -> Result<i64> {
        raw.trim().parse::<i64>().map_err(|_| {
            ForecastError::InvalidHorizon(format!("'{}' is not an integer", raw))
        })
    }
}

/// Files written by a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifacts {
    pub export: PathBuf,
    pub comparison_chart: PathBuf,
    pub selected_chart: PathBuf,
}

/// Outcome of a forecast comparison
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// The selected model
    pub selected: ModelKind,
    /// Accuracy of the selected model
    pub accuracy: Accuracy,
    /// Accuracy of every model
    pub model_accuracies: BTreeMap<ModelKind, Accuracy>,
    /// Export rows of the selected model
    pub predictions: Vec<ForecastRecord>,
    /// Forecasts of every model, in comparison order
    pub results: Vec<ForecastResult>,
    /// Prepared monthly history
    pub history: Vec<Observation>,
    pub artifacts: Artifacts,
}

impl ComparisonReport {
    /// Result of a given model
    pub fn result(&self, kind: ModelKind) -> Option<&ForecastResult> {
        self.results.iter().find(|r| r.model == kind)
    }

    /// Result of the selected model
    pub fn selected_result(&self) -> Option<&ForecastResult> {
        self.result(self.selected)
    }
}

/// Runs all models on an upload and writes the charts and export
pub struct ForecastService {
    config: ServiceConfig,
    renderer: Box<dyn ChartRenderer>,
}

impl ForecastService {
    /// Service rendering PNG charts
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_renderer(config, Box::new(PngChartRenderer::new()))
    }

    /// Service with a custom chart renderer
    pub fn with_renderer(config: ServiceConfig, renderer: Box<dyn ChartRenderer>) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the comparison.
    ///
    /// The selector and horizon are validated before any work is done, so a
    /// rejected request never touches the output files. A failure in any
    /// model fails the whole run.
    pub fn run(&self, request: &ForecastRequest) -> Result<ComparisonReport> {
        let selected: ModelKind = request.model.parse()?;

        if request.periods < 1 {
            return Err(ForecastError::InvalidHorizon(format!(
                "horizon must be a positive integer, got {}",
                request.periods
            )));
        }
        let horizon = usize::try_from(request.periods).map_err(|_| {
            ForecastError::InvalidHorizon(format!("horizon {} is too large", request.periods))
        })?;

        let df = DataLoader::read_csv_bytes(&request.csv)?;
        let table = ObservationTable::prepare(&df, &request.date_column, &request.value_column)?;
        let dates = forecast_dates(table.dates(), horizon)?;
        debug!(
            observations = table.len(),
            first = ?table.dates().first(),
            last = ?table.last_date(),
            horizon,
            "Prepared monthly series"
        );

        let results = ModelKind::ALL
            .iter()
            .map(|&kind| run_model(kind, &table, &dates))
            .collect::<Result<Vec<_>>>()?;

        let selected_result = results
            .iter()
            .find(|r| r.model == selected)
            .ok_or_else(|| ForecastError::ForecastingError(format!("No result for {}", selected)))?;

        let history = table.observations();
        let artifacts = Artifacts {
            export: self.config.export_path(),
            comparison_chart: self.config.comparison_chart_path(),
            selected_chart: self.config.selected_chart_path(),
        };

        self.config.ensure_output_dir()?;
        let size = self.config.chart_size();
        self.renderer.render(
            &comparison_chart(&history, &results, size),
            &artifacts.comparison_chart,
        )?;
        self.renderer.render(
            &selected_chart(&history, selected_result, size),
            &artifacts.selected_chart,
        )?;

        let predictions = records_from_result(selected_result);
        write_forecast_csv(&artifacts.export, &predictions)?;

        let accuracy = selected_result.accuracy;
        let model_accuracies = results.iter().map(|r| (r.model, r.accuracy)).collect();

        info!(
            model = %selected,
            horizon,
            observations = table.len(),
            %accuracy,
            "Forecast comparison complete"
        );

        Ok(ComparisonReport {
            selected,
            accuracy,
            model_accuracies,
            predictions,
            results,
            history,
            artifacts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3", 3)]
    #[case(" 12 ", 12)]
    #[case("0", 0)]
    #[case("-2", -2)]
    fn test_parse_periods(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(ForecastRequest::parse_periods(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("three")]
    #[case("2.5")]
    fn test_parse_periods_rejects_non_integers(#[case] raw: &str) {
        assert!(matches!(
            ForecastRequest::parse_periods(raw),
            Err(ForecastError::InvalidHorizon(_))
        ));
    }
}
