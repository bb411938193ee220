//! HTTP route handlers and router assembly.
//!
//! Every response, including the not-found fallback and body parse
//! rejections, passes through the same stack of layers:
//!
//! 1. request ID span (outermost)
//! 2. security headers
//! 3. permissive CORS
//! 4. JSON body parsing

pub mod health;
pub mod home;

use axum::{http::Uri, middleware, routing::get, Router};
use http::header::{HeaderName, HeaderValue};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer};

use crate::config::SECURITY_HEADERS;
use crate::error::AppError;
use crate::middleware::{json_body_layer, request_id_layer};
use crate::state::AppState;

/// Fallback for unmatched routes.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Attach the fixed security header set. Headers set by handlers are overridden.
fn with_security_headers(router: Router) -> Router {
    SECURITY_HEADERS
        .iter()
        .fold(router, |router, &(name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
}

/// Creates the Axum router with all routes and response-shaping layers.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(home::index))
        .route("/health", get(health::health))
        .fallback(not_found)
        .with_state(state)
        // Also wraps the fallback, so unmatched paths get their bodies checked too
        .layer(middleware::from_fn(json_body_layer))
        // CORS - any origin, answers preflight requests directly
        .layer(CorsLayer::permissive());

    with_security_headers(router)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
