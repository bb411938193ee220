//! renovate-demo: a minimal JSON HTTP API.
//!
//! Serves an informational root route and a health check, wrapped in
//! security headers, permissive CORS, and JSON body validation.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
