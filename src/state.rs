//! Shared application state for request handlers.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};

/// Shared application state, cloned into every handler.
///
/// Holds only the instant the process started serving; nothing here is
/// mutated after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    started_at: Instant,
}

impl AppState {
    /// Creates state anchored at the current instant. Call once at startup.
    pub fn new() -> Self {
        Self::with_start(Instant::now())
    }

    pub fn with_start(started_at: Instant) -> Self {
        Self { started_at }
    }

    /// Seconds elapsed since the process started.
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Current UTC time as an ISO-8601 string with millisecond precision,
/// e.g. `2024-05-01T12:00:00.000Z`.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_uptime_is_non_decreasing() {
        let state = AppState::new();
        let first = state.uptime_secs();
        let second = state.uptime_secs();
        assert!(first >= 0.0);
        assert!(second >= first);
    }

    #[test]
    fn test_uptime_counts_from_start() {
        let Some(start) = Instant::now().checked_sub(Duration::from_secs(5)) else {
            return;
        };
        let state = AppState::with_start(start);
        assert!(state.uptime_secs() >= 5.0);
    }

    #[test]
    fn test_iso_timestamp_shape() {
        let ts = iso_timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-05-01T12:00:00.000Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
