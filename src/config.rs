//! Gateway configuration module
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Built once in `main` and shared read-only through router state.

use crate::error::GatewayError;
use std::env;
use std::time::Duration;

/// Public node queried when a request does not name one
pub const DEFAULT_SERVER: &str = "api.chainweb.com";

/// Contract queried when a request does not name one
pub const DEFAULT_TOKEN: &str = "coin";

/// Upper bound for a single upstream call, equal to the command TTL
pub const DEFAULT_SHARD_QUERY_TIMEOUT_SECS: u64 = 600;

/// Largest chain graph a node may announce before it is treated as malformed
pub const DEFAULT_MAX_CHAIN_COUNT: usize = 100;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Node host used when the request has no `server` parameter
    pub default_server: String,

    /// Token contract used when the request has no `token` parameter
    pub default_token: String,

    /// Per-call bound on info, cut and local requests
    pub shard_query_timeout: Duration,

    /// Upper bound on the chain count accepted from a node's graph history
    pub max_chain_count: usize,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http_port: 3000,
            default_server: DEFAULT_SERVER.to_string(),
            default_token: DEFAULT_TOKEN.to_string(),
            shard_query_timeout: Duration::from_secs(DEFAULT_SHARD_QUERY_TIMEOUT_SECS),
            max_chain_count: DEFAULT_MAX_CHAIN_COUNT,
            log_level: "info".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Split out of `from_env` so parsing can be tested without touching
    /// process-wide environment state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let http_port = match lookup("HTTP_PORT").or_else(|| lookup("PORT")) {
            Some(raw) => raw.parse().map_err(|e| {
                GatewayError::Config(format!("HTTP_PORT must be a valid port number: {e}"))
            })?,
            None => defaults.http_port,
        };

        let default_server = lookup("DEFAULT_SERVER")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.default_server);

        let default_token = lookup("DEFAULT_TOKEN")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.default_token);

        let shard_query_timeout = match lookup("SHARD_QUERY_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| {
                    GatewayError::Config(format!(
                        "SHARD_QUERY_TIMEOUT_SECS must be a valid number: {e}"
                    ))
                })?;
                if secs == 0 {
                    return Err(GatewayError::Config(
                        "SHARD_QUERY_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.shard_query_timeout,
        };

        let max_chain_count = match lookup("MAX_CHAIN_COUNT") {
            Some(raw) => {
                let count: usize = raw.parse().map_err(|e| {
                    GatewayError::Config(format!("MAX_CHAIN_COUNT must be a valid number: {e}"))
                })?;
                if count == 0 {
                    return Err(GatewayError::Config(
                        "MAX_CHAIN_COUNT must be greater than zero".to_string(),
                    ));
                }
                count
            }
            None => defaults.max_chain_count,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            http_port,
            default_server,
            default_token,
            shard_query_timeout,
            max_chain_count,
            log_level,
        })
    }
}
