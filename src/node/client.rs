//! reqwest-backed `NodeApi`

use super::{cut_url, info_url, local_url, Cut, LocalResponse, NodeApi, NodeInfo};
use crate::error::{GatewayError, NodeError};
use crate::pact::LocalCommand;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Response bodies quoted in errors are cut to this many characters
const MAX_ERROR_BODY: usize = 512;

/// HTTP client for Chainweb nodes
#[derive(Debug, Clone)]
pub struct HttpNodeClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpNodeClient {
    /// Build a client whose every call is bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chainweb-balance-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, timeout })
    }

    fn transport_error(&self, url: &str, source: reqwest::Error) -> NodeError {
        if source.is_timeout() {
            NodeError::Timeout {
                url: url.to_string(),
                after_secs: self.timeout.as_secs(),
            }
        } else {
            NodeError::Request {
                url: url.to_string(),
                source,
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, NodeError> {
        debug!(url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        self.decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        url: String,
        response: reqwest::Response,
    ) -> Result<T, NodeError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        if !status.is_success() {
            return Err(NodeError::Status {
                url,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|source| NodeError::Decode { url, source })
    }
}

#[async_trait]
impl NodeApi for HttpNodeClient {
    async fn info(&self, server: &str) -> Result<NodeInfo, NodeError> {
        self.get_json(info_url(server)).await
    }

    async fn cut(
        &self,
        server: &str,
        api_version: &str,
        node_version: &str,
    ) -> Result<Cut, NodeError> {
        self.get_json(cut_url(server, api_version, node_version)).await
    }

    async fn local(
        &self,
        server: &str,
        node_version: &str,
        chain_id: &str,
        command: &LocalCommand,
    ) -> Result<LocalResponse, NodeError> {
        let url = local_url(server, node_version, chain_id);
        debug!(url, hash = %command.hash, "POST local");

        let response = self
            .http
            .post(&url)
            .json(command)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        self.decode(url, response).await
    }
}
