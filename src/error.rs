//! Domain error types for the balance gateway
//!
//! Two tiers: `GatewayError` aborts a whole request, `NodeError` describes a
//! single failed upstream call. Shard queries convert their `NodeError` into
//! data (`ShardStatus::Error`) and never surface it as a `GatewayError`.
//!
//! main.rs is the ONLY module allowed to use anyhow::Result (process boundary).
//! All application code returns Result<T, GatewayError> or Result<T, NodeError>.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of one call against a Chainweb node
#[derive(Error, Debug)]
pub enum NodeError {
    /// Connection, TLS or other transport failure
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Node answered with a non-2xx status
    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    /// Body was not the JSON shape we expected
    #[error("malformed response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Body parsed but lacks data we depend on
    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    /// No answer within the per-call bound
    #[error("request to {url} timed out after {after_secs}s")]
    Timeout { url: String, after_secs: u64 },
}

/// Request-fatal gateway errors
///
/// Every variant carries enough context for diagnostics; callers match on
/// the variant (or `is_client_error`) to pick the HTTP status.
///
/// Example log output:
/// ```text
/// GatewayError::UpstreamUnavailable { server: "api.chainweb.com", .. }
/// → "unable to fetch topology from api.chainweb.com"
/// ```
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Required `account` query parameter missing or empty
    #[error("Account parameter is required")]
    MissingAccount,

    /// Token is not a plain module reference
    #[error("invalid token identifier '{token}'")]
    InvalidToken { token: String },

    /// Topology could not be resolved (info or cut endpoint failed)
    #[error("unable to fetch topology from {server}")]
    UpstreamUnavailable {
        server: String,
        #[source]
        source: NodeError,
    },

    /// Configuration error (environment variable invalid)
    #[error("configuration error: {0}")]
    Config(String),

    /// Prometheus recorder could not be installed
    #[error("metrics recorder installation failed")]
    MetricsInstall(#[source] metrics_exporter_prometheus::BuildError),
}

impl GatewayError {
    /// Returns a static label string suitable for Prometheus metrics.
    ///
    /// Used as the `error_type` label on `gateway_errors_total`.
    pub fn error_type_label(&self) -> &'static str {
        match self {
            Self::MissingAccount => "missing_account",
            Self::InvalidToken { .. } => "invalid_token",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::Config(_) => "config",
            Self::MetricsInstall(_) => "metrics_install",
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingAccount | Self::InvalidToken { .. })
    }

    /// HTTP status the request handler answers with
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream() -> GatewayError {
        GatewayError::UpstreamUnavailable {
            server: "api.chainweb.com".to_string(),
            source: NodeError::Status {
                url: "https://api.chainweb.com/info".to_string(),
                status: 503,
                body: "unavailable".to_string(),
            },
        }
    }

    #[test]
    fn every_variant_has_distinct_error_type_label() {
        let labels = [
            GatewayError::MissingAccount.error_type_label(),
            GatewayError::InvalidToken {
                token: "x y".to_string(),
            }
            .error_type_label(),
            upstream().error_type_label(),
            GatewayError::Config("test".to_string()).error_type_label(),
        ];

        let mut unique = labels.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(labels.len(), unique.len(), "Duplicate error_type_label found");
    }

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(GatewayError::MissingAccount.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GatewayError::InvalidToken { token: "(".to_string() }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(upstream().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!upstream().is_client_error());
    }

    #[test]
    fn error_messages_contain_context() {
        assert!(upstream().to_string().contains("api.chainweb.com"));

        let err = NodeError::Timeout {
            url: "https://node/cut".to_string(),
            after_secs: 600,
        };
        assert_eq!(err.to_string(), "request to https://node/cut timed out after 600s");

        let err = NodeError::Status {
            url: "https://node/info".to_string(),
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn upstream_error_keeps_source_chain() {
        let err = upstream();
        let source = std::error::Error::source(&err).expect("source should be set");
        assert!(source.to_string().contains("HTTP 503"));
    }

    #[test]
    fn config_error_preserves_message() {
        let err = GatewayError::Config("HTTP_PORT must be a valid port number".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: HTTP_PORT must be a valid port number"
        );
    }
}
