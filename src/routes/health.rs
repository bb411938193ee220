//! Health check endpoint for container orchestration.
//!
//! Reports liveness along with process uptime. No dependencies are probed;
//! if the process can answer HTTP, it is healthy.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::HEALTH_STATUS;
use crate::state::{iso_timestamp, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Seconds since process start
    pub uptime: f64,
    pub timestamp: String,
}

/// Health check handler.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS,
        uptime: state.uptime_secs(),
        timestamp: iso_timestamp(),
    })
}
