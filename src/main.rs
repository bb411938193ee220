//! renovate-demo: a minimal JSON HTTP API.
//!
//! This is the application entry point. It loads `.env`, reads configuration
//! from the environment, initializes tracing, builds the Axum router and
//! starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use renovate_demo::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use renovate_demo::http::start_server;
use renovate_demo::{create_router, AppState};

/// renovate-demo: a minimal JSON HTTP API
#[derive(Parser, Debug)]
#[command(name = "renovate-demo", version, about)]
struct Args {
    /// Log level filter (e.g., "renovate_demo=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log output format; overrides LOG_FORMAT
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Uptime is measured from here
    let state = AppState::new();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::debug!(
        port = config.http.port,
        host = %config.http.host,
        log_format = %config.logging.format,
        "Loaded configuration"
    );

    let app = create_router(state);

    start_server(app, &config).await?;

    Ok(())
}
