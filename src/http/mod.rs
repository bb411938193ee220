//! HTTP server module.
//!
//! The server includes:
//! - Startup log lines once the listening socket is bound
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
