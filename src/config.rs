//! Configuration loading and constants.
//!
//! The service is configured entirely from the environment: `PORT` selects the
//! listening port and `LOG_FORMAT` the log output format. Response-shaping
//! header values and request limits are compile-time constants.

use std::fmt;
use std::str::FromStr;

use const_format::formatcp;

// =============================================================================
// API Payload Constants
// =============================================================================

/// Descriptive message returned by `GET /`
pub const API_MESSAGE: &str = "Renovate Demo API";

/// API version reported by `GET /`. Fixed, independent of the crate version.
pub const API_VERSION: &str = "1.0.0";

/// Status literal reported by `GET /health`
pub const HEALTH_STATUS: &str = "healthy";

// =============================================================================
// Security Headers
// =============================================================================
// Secure-by-default response headers attached to every response, including
// 404s and body parse rejections.

/// HSTS lifetime in seconds (180 days)
pub const HSTS_MAX_AGE: u32 = 15_552_000;

pub const STRICT_TRANSPORT_SECURITY: &str =
    formatcp!("max-age={}; includeSubDomains", HSTS_MAX_AGE);

pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self';base-uri 'self';\
font-src 'self' https: data:;form-action 'self';frame-ancestors 'self';\
img-src 'self' data:;object-src 'none';script-src 'self';\
script-src-attr 'none';style-src 'self' https: 'unsafe-inline';\
upgrade-insecure-requests";

/// Header name/value pairs applied to every response.
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", STRICT_TRANSPORT_SECURITY),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

// =============================================================================
// Request Limits
// =============================================================================

/// Maximum accepted JSON request body size in bytes (100 KiB)
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

// =============================================================================
// Server Defaults
// =============================================================================

/// Port used when `PORT` is unset or not a valid port number
pub const DEFAULT_PORT: u16 = 3000;

/// Bind address; listen on all interfaces
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Seconds to wait for in-flight requests after a shutdown signal
pub const SHUTDOWN_GRACE_SECS: u64 = 10;

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "renovate_demo=info,tower_http=info";

pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// A `.env` file in the working directory, if present, is loaded first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Invalid values never fail: they fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_port(lookup(PORT_ENV).as_deref());

        let format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse().unwrap_or_default(),
            None => LogFormat::default(),
        };

        Self {
            http: HttpServerConfig {
                host: DEFAULT_HOST.to_string(),
                port,
            },
            logging: LoggingConfig { format },
        }
    }
}

/// Parse a port value, falling back to [`DEFAULT_PORT`] when absent,
/// non-numeric, zero, or out of range.
pub fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}
