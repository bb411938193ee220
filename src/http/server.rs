//! HTTP server startup logic.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::config::{AppConfig, SHUTDOWN_GRACE_SECS};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),
}

/// Start the HTTP server based on configuration.
///
/// Installs the signal handlers for graceful shutdown and blocks until the
/// server stops. A bind failure is returned immediately.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| {
            ServerError::InvalidAddress(format!(
                "{}:{}: {}",
                config.http.host, config.http.port, e
            ))
        })?;

    let handle = Handle::new();
    shutdown::setup_shutdown_handler(handle.clone(), Duration::from_secs(SHUTDOWN_GRACE_SECS));

    serve(app, addr, handle).await
}

/// Serve `app` on `addr` until `handle` is shut down.
///
/// The startup lines are logged once the socket is actually bound, so a
/// port of 0 reports the port the OS picked.
pub async fn serve(app: Router, addr: SocketAddr, handle: Handle) -> Result<(), ServerError> {
    announce_when_listening(handle.clone());

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::debug!("HTTP server stopped");
    Ok(())
}

fn announce_when_listening(handle: Handle) {
    tokio::spawn(async move {
        // None means the bind failed; serve() reports that error.
        if let Some(local) = handle.listening().await {
            let port = local.port();
            tracing::info!(%local, "Server running on port {}", port);
            tracing::info!("Health check: http://localhost:{}/health", port);
        }
    });
}
