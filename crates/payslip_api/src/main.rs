//! Payslip REST API Server
//!
//! Main binary for running the API server in production or development.
//!
//! # Environment Variables
//!
//! - `PAYSLIP_CONFIG`: Settings file (default: config/settings.toml)
//! - `API_PORT`: Port to listen on (default: 8000)
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `PAYSLIP_STATIC_DIR`: Front end directory (default: public)
//! - `RUST_LOG`: Log level (default: info)
//! - `LOG_FORMAT`: `json` for structured logs, otherwise human readable

use std::env;

use payslip_api::{ApiServer, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::new(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()));
    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let settings = Settings::from_env()?;
    let server = ApiServer::new(settings);

    tracing::info!("Starting payslip API server");
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        timeout_secs = server.settings().request_timeout_secs,
        "Settings loaded"
    );

    // Start server with graceful shutdown
    server.serve().await
}
