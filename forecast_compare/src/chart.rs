//! Chart rendering for the comparison and selected-model plots

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastResult, ModelKind};
use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use std::path::Path;

/// Title of the comparison chart
pub const COMPARISON_TITLE: &str = "Model Comparison";

const HISTORY_COLOR: (u8, u8, u8) = (0, 0, 0);
const SELECTED_COLOR: (u8, u8, u8) = (255, 165, 0);

/// Line color used for a model on the comparison chart
pub fn model_color(kind: ModelKind) -> (u8, u8, u8) {
    match kind {
        ModelKind::HoltWinters => (255, 0, 0),
        ModelKind::Arima => (0, 128, 0),
        ModelKind::Naive => (0, 0, 255),
    }
}

/// One labelled line
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub color: (u8, u8, u8),
    pub points: Vec<(NaiveDate, f64)>,
}

/// Everything needed to draw a line chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    pub series: Vec<ChartSeries>,
}

/// Draws a chart to an image file, replacing any existing file
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<()>;
}

fn history_series(history: &[Observation]) -> ChartSeries {
    ChartSeries {
        label: "Historical".to_string(),
        color: HISTORY_COLOR,
        points: history.iter().map(|o| (o.date, o.value)).collect(),
    }
}

fn forecast_points(result: &ForecastResult) -> Vec<(NaiveDate, f64)> {
    result.points.iter().map(|p| (p.date, p.value)).collect()
}

/// History plus every model's forecast
pub fn comparison_chart(
    history: &[Observation],
    results: &[ForecastResult],
    size: (u32, u32),
) -> ChartSpec {
    let mut series = vec![history_series(history)];
    series.extend(results.iter().map(|result| ChartSeries {
        label: result.model.label().to_string(),
        color: model_color(result.model),
        points: forecast_points(result),
    }));

    ChartSpec {
        title: COMPARISON_TITLE.to_string(),
        x_label: "Date".to_string(),
        y_label: "Value".to_string(),
        width: size.0,
        height: size.1,
        series,
    }
}

/// History plus the selected model's forecast
pub fn selected_chart(history: &[Observation], result: &ForecastResult, size: (u32, u32)) -> ChartSpec {
    let label = result.model.label().to_string();

    ChartSpec {
        title: label.clone(),
        x_label: "Date".to_string(),
        y_label: "Value".to_string(),
        width: size.0,
        height: size.1,
        series: vec![
            history_series(history),
            ChartSeries {
                label,
                color: SELECTED_COLOR,
                points: forecast_points(result),
            },
        ],
    }
}

/// Position of a month on the x axis
pub fn month_index(date: NaiveDate) -> f64 {
    (date.year() * 12 + date.month0() as i32) as f64
}

/// `YYYY-MM` label for an x axis position
pub fn month_label(index: f64) -> String {
    let months = index.round() as i64;
    format!("{:04}-{:02}", months.div_euclid(12), months.rem_euclid(12) + 1)
}

/// Axis ranges covering every point, padded so flat or single-point series still draw
fn axis_ranges(spec: &ChartSpec) -> Option<((f64, f64), (f64, f64))> {
    let points = spec.series.iter().flat_map(|s| s.points.iter());

    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for (date, value) in points {
        let index = month_index(*date);
        x = (x.0.min(index), x.1.max(index));
        if value.is_finite() {
            y = (y.0.min(*value), y.1.max(*value));
        }
    }

    if !x.0.is_finite() || !y.0.is_finite() {
        return None;
    }
    if x.1 - x.0 < 1.0 {
        x.1 = x.0 + 1.0;
    }

    let pad = match (y.1 - y.0) * 0.05 {
        pad if pad > 0.0 => pad,
        _ => y.0.abs().max(1.0) * 0.05,
    };

    Some((x, (y.0 - pad, y.1 + pad)))
}

/// PNG renderer on the plotters bitmap backend
#[derive(Debug, Clone, Default)]
pub struct PngChartRenderer;

impl PngChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn chart_error<E: std::fmt::Display>(err: E) -> ForecastError {
    ForecastError::ChartError(err.to_string())
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<()> {
        let ((x_min, x_max), (y_min, y_max)) = axis_ranges(spec)
            .ok_or_else(|| ForecastError::ChartError("Nothing to plot".to_string()))?;

        let root = BitMapBackend::new(path, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_labels(8)
            .x_label_formatter(&|x| month_label(*x))
            .draw()
            .map_err(chart_error)?;

        for series in &spec.series {
            let (r, g, b) = series.color;
            let color = RGBColor(r, g, b);
            chart
                .draw_series(LineSeries::new(
                    series.points.iter().map(|(d, v)| (month_index(*d), *v)),
                    color.stroke_width(2),
                ))
                .map_err(chart_error)?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
        Ok(())
    }
}
