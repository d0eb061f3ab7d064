//! Forecast comparison HTTP server
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `FORECAST_OUTPUT_DIR`: Directory for charts and the export (default: static)
//! - `RUST_LOG`: Log filter

use forecast_compare::ForecastService;
use forecast_server::config::DEFAULT_LOG_FILTER;
use forecast_server::{create_router, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .init();

    let config = ServerConfig::from_env()?;
    let service_config = config.service_config();
    service_config.ensure_output_dir()?;
    info!(output_dir = %service_config.output_dir.display(), "Output directory ready");

    let app = create_router(AppState::new(ForecastService::new(service_config)));

    let addr = config.socket_addr()?;
    info!(
        "forecast-server v{} listening on http://{}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
