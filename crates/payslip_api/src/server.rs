//! HTTP server configuration and startup
//!
//! This module provides the main server startup logic.

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;

use crate::{routes, settings::Settings};

/// API server
pub struct ApiServer {
    settings: Settings,
}

impl ApiServer {
    /// Create a new API server with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the Axum router with all routes and middleware.
    ///
    /// # Errors
    ///
    /// Returns an error if a route declaration is invalid.
    pub fn router(&self) -> anyhow::Result<Router> {
        Ok(routes::create_router(&self.settings)?)
    }

    /// Start the server and listen for requests.
    ///
    /// This method blocks until the server is shut down gracefully via
    /// CTRL+C (SIGINT) or SIGTERM signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the routes are invalid or the server fails to
    /// bind to the configured address.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.settings.socket_addr()?;
        let app = self.router()?;

        tracing::info!("Starting API server on {}", addr);
        tracing::info!(
            static_dir = %self.settings.static_dir.display(),
            "Serving front end"
        );

        let listener = TcpListener::bind(addr).await?;

        // Serve with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Wait for shutdown signal (CTRL+C or SIGTERM)
///
/// A signal handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
