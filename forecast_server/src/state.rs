//! Application state for the HTTP server.

use forecast_compare::ForecastService;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Forecast service writing to the configured output directory
    pub service: Arc<ForecastService>,
    /// Held while the output files are written or read
    pub output_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Create a new application state around the given service.
    pub fn new(service: ForecastService) -> Self {
        Self {
            service: Arc::new(service),
            output_lock: Arc::new(Mutex::new(())),
        }
    }
}
