//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g. production)
//! - `ORDER_PROCESSING_DELAY_MS` - Simulated payment processing time (default: 2000)
//! - `CONTACT_SUBMIT_DELAY_MS` - Simulated contact form submission time (default: 1500)
//! - `TOAST_TTL_SECONDS` - How long notifications stay visible (default: 3)
//! - `TRUST_PROXY_HEADERS` - Key the rate limiter on `X-Forwarded-For` /
//!   `X-Real-IP` instead of the peer address; only set behind a proxy that
//!   overwrites them (default: false)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ORDER_DELAY_MS: u64 = 2000;
const DEFAULT_CONTACT_DELAY_MS: u64 = 1500;
const DEFAULT_TOAST_TTL_SECONDS: i64 = 3;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Simulated order submission time
    pub order_processing_delay: Duration,
    /// Simulated contact message submission time
    pub contact_submit_delay: Duration,
    /// Toast lifetime
    pub toast_ttl: chrono::Duration,
    /// Whether client IP headers from the reverse proxy are trusted
    pub trust_proxy_headers: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: format!("http://localhost:{DEFAULT_PORT}"),
            sentry_dsn: None,
            sentry_environment: None,
            order_processing_delay: Duration::from_millis(DEFAULT_ORDER_DELAY_MS),
            contact_submit_delay: Duration::from_millis(DEFAULT_CONTACT_DELAY_MS),
            toast_ttl: chrono::Duration::seconds(DEFAULT_TOAST_TTL_SECONDS),
            trust_proxy_headers: false,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        let port = parse_env_or("STOREFRONT_PORT", defaults.port)?;

        Ok(Self {
            host: parse_env_or("STOREFRONT_HOST", defaults.host)?,
            port,
            base_url: get_optional_env("STOREFRONT_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            order_processing_delay: Duration::from_millis(parse_env_or(
                "ORDER_PROCESSING_DELAY_MS",
                DEFAULT_ORDER_DELAY_MS,
            )?),
            contact_submit_delay: Duration::from_millis(parse_env_or(
                "CONTACT_SUBMIT_DELAY_MS",
                DEFAULT_CONTACT_DELAY_MS,
            )?),
            toast_ttl: chrono::Duration::seconds(parse_env_or(
                "TOAST_TTL_SECONDS",
                DEFAULT_TOAST_TTL_SECONDS,
            )?),
            trust_proxy_headers: parse_env_or("TRUST_PROXY_HEADERS", defaults.trust_proxy_headers)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
