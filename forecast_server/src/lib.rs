//! # Forecast Server
//!
//! axum front end for the forecast comparison service.
//!
//! | route | description |
//! |-------|-------------|
//! | `GET /` | upload form |
//! | `POST /forecast` | run a comparison, HTML results |
//! | `POST /api/v1/forecast` | run a comparison, JSON report |
//! | `GET /download_csv` | last forecast export |
//! | `GET /download_chart` | last selected-model chart |
//! | `GET /static/{file}` | files in the output directory |
//! | `GET /health` | liveness |

pub mod config;
pub mod error;
pub mod handlers;
pub mod page;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, AppError};
pub use router::{create_router, MAX_UPLOAD_BYTES};
pub use state::AppState;
