//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use forecast_compare::ForecastError;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body returned for an unknown model selector
pub const INVALID_MODEL_MESSAGE: &str = "Invalid model selected.";

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Unknown model selector
    InvalidModel,
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::InvalidModel => {
                return (StatusCode::BAD_REQUEST, INVALID_MODEL_MESSAGE).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => {
                error!(message = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", msg),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::InvalidModel(_) => AppError::InvalidModel,
            err if err.is_client_error() => AppError::BadRequest(err.to_string()),
            err => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_error_mapping() {
        assert!(matches!(
            AppError::from(ForecastError::InvalidModel("x".to_string())),
            AppError::InvalidModel
        ));
        assert!(matches!(
            AppError::from(ForecastError::MissingColumn("sales".to_string())),
            AppError::BadRequest(msg) if msg.contains("sales")
        ));
        assert!(matches!(
            AppError::from(ForecastError::ChartError("font".to_string())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidModel.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("gone".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
