//! # Forecast Compare
//!
//! Compares monthly forecasts from several models on an uploaded table.
//!
//! ## Features
//!
//! - CSV ingest with flexible date parsing, resampled to month starts
//! - Holt-Winters (additive trend and season), ARIMA(5,1,0) and naive forecasts
//! - Accuracy of each model on the trailing observations
//! - Comparison and selected-model charts rendered with plotters
//! - `ds,yhat` CSV export of the selected forecast
//!
//! ## Quick Start
//!
//! ```ignore
//! use forecast_compare::{ForecastRequest, ForecastService, ServiceConfig};
//!
//! let service = ForecastService::new(ServiceConfig::default());
//! let report = service.run(&ForecastRequest {
//!     csv: std::fs::read("sales.csv")?,
//!     date_column: "month".to_string(),
//!     value_column: "sales".to_string(),
//!     periods: 6,
//!     model: "holtwinters".to_string(),
//! })?;
//!
//! println!("{} accuracy: {}", report.selected, report.accuracy);
//! ```

pub mod accuracy;
pub mod calendar;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use crate::accuracy::Accuracy;
pub use crate::chart::{ChartRenderer, ChartSpec, PngChartRenderer};
pub use crate::config::ServiceConfig;
pub use crate::data::{DataLoader, Observation, ObservationTable};
pub use crate::error::ForecastError;
pub use crate::export::ForecastRecord;
pub use crate::models::{ForecastPoint, ForecastResult, ModelKind};
pub use crate::service::{Artifacts, ComparisonReport, ForecastRequest, ForecastService};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
