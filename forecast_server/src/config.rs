//! Server configuration from the environment.

use anyhow::Context;
use forecast_compare::ServiceConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "forecast_server=info,forecast_compare=info,tower_http=info";

/// Bind address and output location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub output_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            output_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `FORECAST_OUTPUT_DIR` from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, falling back to defaults for absent keys
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            output_dir: lookup("FORECAST_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid HOST:PORT '{}:{}'", self.host, self.port))
    }

    /// Service configuration writing to the configured output directory
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::with_output_dir(&self.output_dir)
    }
}
