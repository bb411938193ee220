//! Request middleware.
//!
//! - `request_id_layer`: wraps each request in a tracing span keyed by a UUID v4
//!   and echoes the id back in an `x-request-id` response header.
//! - `json_body_layer`: buffers and validates JSON request bodies before they
//!   reach routing, rejecting malformed or oversized payloads with a 4xx.

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::Request,
    middleware::Next,
    response::Response,
};
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::JSON_BODY_LIMIT;
use crate::error::AppError;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Extension type for accessing request ID in handlers if needed.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that generates a request ID and creates a request span.
///
/// This should be the outermost middleware layer so the span wraps
/// all request processing, including other middleware and handlers.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    let mut request = request;
    request.extensions_mut().insert(RequestId(request_id));

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(X_REQUEST_ID, value);
        }

        response
    }
    .instrument(span)
    .await
}

/// Middleware that parses JSON request bodies ahead of routing.
///
/// Only requests declaring a JSON content type are inspected. The buffered
/// body is re-attached so handlers can still extract it.
pub async fn json_body_layer(request: Request, next: Next) -> Result<Response, AppError> {
    if !is_json_content_type(request.headers()) {
        return Ok(next.run(request).await);
    }

    if let Some(declared) = declared_length(request.headers()) {
        if declared > JSON_BODY_LIMIT {
            return Err(AppError::PayloadTooLarge {
                limit: JSON_BODY_LIMIT,
            });
        }
    }

    let (parts, body) = request.into_parts();
    // Chunked bodies carry no declared length, so enforce the limit while buffering.
    let bytes = Limited::new(body, JSON_BODY_LIMIT)
        .collect()
        .await
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                AppError::PayloadTooLarge {
                    limit: JSON_BODY_LIMIT,
                }
            } else {
                AppError::BodyRead(e.to_string())
            }
        })?
        .to_bytes();

    validate_json(&bytes)?;

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Accepts `application/json` and `application/<subtype>+json`, with any parameters.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Empty bodies pass. Anything else must be a JSON object or array.
fn validate_json(bytes: &Bytes) -> Result<(), AppError> {
    let Some(first) = bytes.iter().find(|b| !b.is_ascii_whitespace()) else {
        return Ok(());
    };

    // Syntax errors take precedence so `nope` reports as malformed.
    serde_json::from_slice::<serde::de::IgnoredAny>(bytes)?;

    if *first != b'{' && *first != b'[' {
        return Err(AppError::StrictJson);
    }

    Ok(())
}
