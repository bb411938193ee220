//! Graceful shutdown and signal handling.
//!
//! SIGTERM/SIGINT stop the listener and drain in-flight requests.

use std::time::Duration;

use axum_server::Handle;

/// Which signal asked the process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

/// Resolves when SIGINT (Ctrl+C) or, on Unix, SIGTERM is received.
///
/// If a handler cannot be installed the corresponding branch never resolves,
/// leaving the host's default kill behavior in place.
pub async fn wait_for_signal() -> ShutdownSignal {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => ShutdownSignal::Interrupt,
        _ = terminate => ShutdownSignal::Terminate,
    }
}

/// Setup graceful shutdown on SIGTERM and SIGINT.
///
/// When either signal is received the server stops accepting new connections
/// and waits up to `grace` for existing ones to complete.
pub fn setup_shutdown_handler(handle: Handle, grace: Duration) {
    tokio::spawn(async move {
        match wait_for_signal().await {
            ShutdownSignal::Interrupt => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            ShutdownSignal::Terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }

        handle.graceful_shutdown(Some(grace));
        tracing::info!(
            grace_secs = grace.as_secs(),
            "Graceful shutdown initiated, waiting for connections to close"
        );
    });
}
