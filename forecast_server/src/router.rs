//! Router configuration.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers;
use super::state::AppState;

/// Largest accepted request body
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Chart previews come straight from the output directory, under the output lock
    let static_files: Router = Router::new()
        .fallback_service(ServeDir::new(&state.service.config().output_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::hold_output_lock,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/forecast", post(handlers::forecast_page))
        .route("/api/v1/forecast", post(handlers::forecast_json))
        .route("/download_csv", get(handlers::download_csv))
        .route("/download_chart", get(handlers::download_chart))
        .route("/health", get(handlers::health_check))
        .nest_service("/static", static_files)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_compare::{ForecastService, ServiceConfig};

    #[test]
    fn test_router_creation() {
        let state = AppState::new(ForecastService::new(ServiceConfig::default()));
        let _router = create_router(state);
    }
}
