//! Root informational endpoint.

use axum::Json;
use serde::Serialize;

use crate::config::{API_MESSAGE, API_VERSION};
use crate::state::iso_timestamp;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: API_MESSAGE,
        version: API_VERSION,
        timestamp: iso_timestamp(),
    })
}
