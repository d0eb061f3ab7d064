//! HTTP handlers.
//!
//! Forecast runs are CPU-bound and write to fixed output paths, so each run
//! executes on the blocking pool while holding the output lock.

use axum::{
    body::{to_bytes, Body},
    extract::{Multipart, Request, State},
    http::header,
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Json,
};
use forecast_compare::{ComparisonReport, ForecastRequest, ModelKind};
use serde_json::{json, Value};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::error::AppError;
use super::page::render_page;
use super::state::AppState;

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(None, state.service.config()))
}

/// POST /forecast
///
/// Run the comparison and render the results page.
pub async fn forecast_page(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let request = read_forecast_form(multipart).await?;
    let report = run_forecast(&state, request).await?;
    Ok(Html(render_page(Some(&report), state.service.config())))
}

/// POST /api/v1/forecast
///
/// Run the comparison and return the report as JSON.
pub async fn forecast_json(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ComparisonReport>, AppError> {
    let request = read_forecast_form(multipart).await?;
    let report = run_forecast(&state, request).await?;
    Ok(Json(report))
}

/// GET /download_csv
pub async fn download_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let config = state.service.config();
    let _guard = state.output_lock.lock().await;
    attachment(&config.export_path(), &config.export_file, "text/csv").await
}

/// GET /download_chart
pub async fn download_chart(State(state): State<AppState>) -> Result<Response, AppError> {
    let config = state.service.config();
    let _guard = state.output_lock.lock().await;
    attachment(
        &config.selected_chart_path(),
        &config.selected_chart_file,
        "image/png",
    )
    .await
}

/// Serve a request under the output lock, buffering the whole body so a
/// file is never streamed while a run rewrites it
pub async fn hold_output_lock(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let _guard = state.output_lock.lock().await;
    let (parts, body) = next.run(request).await.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AppError::Internal(format!("Could not read output file: {}", e)))?;
    Ok(Response::from_parts(parts, Body::from(bytes)))
}

async fn run_forecast(
    state: &AppState,
    request: ForecastRequest,
) -> Result<ComparisonReport, AppError> {
    let _guard = state.output_lock.lock().await;
    let service = Arc::clone(&state.service);

    let report = tokio::task::spawn_blocking(move || service.run(&request))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    info!(
        model = %report.selected,
        accuracy = %report.accuracy,
        "Served forecast"
    );
    Ok(report)
}

/// Collect the upload form into a request.
///
/// The model selector is checked before the horizon.
async fn read_forecast_form(mut multipart: Multipart) -> Result<ForecastRequest, AppError> {
    let mut csv = None;
    let mut date_column = None;
    let mut value_column = None;
    let mut periods = None;
    let mut model = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Could not read upload: {}", e)))?;
                csv = Some(bytes.to_vec());
            }
            "date_col" | "value_col" | "periods" | "model" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Could not read '{}': {}", name, e)))?;
                match name.as_str() {
                    "date_col" => date_column = Some(text),
                    "value_col" => value_column = Some(text),
                    "periods" => periods = Some(text),
                    _ => model = Some(text),
                }
            }
            _ => {}
        }
    }

    let model = required(model, "model")?;
    model.parse::<ModelKind>()?;

    let periods = ForecastRequest::parse_periods(&required(periods, "periods")?)?;

    Ok(ForecastRequest {
        csv: required(csv, "file")?,
        date_column: required(date_column, "date_col")?.trim().to_string(),
        value_column: required(value_column, "value_col")?.trim().to_string(),
        periods,
        model,
    })
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing form field '{}'", field)))
}

async fn attachment(path: &Path, filename: &str, content_type: &str) -> Result<Response, AppError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "{} has not been generated yet",
                filename
            )));
        }
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
