//! API Configuration Module
//!
//! Server-level settings (bind address, CORS, outbound timeouts) and the
//! deployment environment. Everything is read from environment variables
//! once at startup, with development defaults.

use std::net::SocketAddr;
use std::time::Duration;

use coursereview_core::ConfigError;

/// Read a variable, falling back to a legacy name when the primary is unset
/// or empty.
pub(crate) fn lookup_with_fallback<F>(lookup: &F, primary: &str, fallback: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(primary)
        .filter(|v| !v.trim().is_empty())
        .or_else(|| lookup(fallback).filter(|v| !v.trim().is_empty()))
        .map(|v| v.trim().to_string())
}

pub(crate) fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

// ============================================================================
// ENVIRONMENT
// ============================================================================

/// Deployment environment, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    /// `COURSEREVIEW_ENVIRONMENT`, falling back to `NODE_ENV`.
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup_with_fallback(&lookup, "COURSEREVIEW_ENVIRONMENT", "NODE_ENV")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for binding, CORS and outbound HTTP.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind.
    pub bind_host: String,

    /// Port to bind.
    pub port: u16,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Timeout applied to every outbound request (backend and revalidation).
    pub http_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3001,
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400, // 24 hours
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `COURSEREVIEW_API_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` / `COURSEREVIEW_API_PORT`: Bind port (default: 3001)
    /// - `COURSEREVIEW_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `COURSEREVIEW_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `COURSEREVIEW_HTTP_TIMEOUT_SECS`: Outbound request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("COURSEREVIEW_API_BIND")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.bind_host);

        let port = match lookup_with_fallback(&lookup, "PORT", "COURSEREVIEW_API_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let cors_origins = lookup("COURSEREVIEW_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = lookup("COURSEREVIEW_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let http_timeout = lookup("COURSEREVIEW_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        Ok(Self {
            bind_host,
            port,
            cors_origins,
            cors_max_age_secs,
            http_timeout,
        })
    }

    /// Socket address built from host and port.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "COURSEREVIEW_API_BIND".to_string(),
                value: addr.clone(),
                reason: e.to_string(),
            })
    }

    /// Build the shared outbound HTTP client.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "COURSEREVIEW_HTTP_TIMEOUT_SECS".to_string(),
                value: format!("{:?}", self.http_timeout),
                reason: format!("Failed to create HTTP client: {}", e),
            })
    }
}
