//! Chainweb node access
//!
//! `NodeApi` is the seam between the gateway core and the three remote
//! endpoints it depends on. `HttpNodeClient` is the production impl.

mod client;
mod types;

pub use client::HttpNodeClient;
pub use types::{Cut, GraphEpoch, LocalResponse, NodeInfo, PactResult};

use crate::error::NodeError;
use crate::pact::LocalCommand;
use async_trait::async_trait;

/// Service API version used for per-chain pact endpoints
pub const PACT_API_VERSION: &str = "0.0";

/// Remote operations the resolver and aggregator call
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// `GET {base}/info`
    async fn info(&self, server: &str) -> Result<NodeInfo, NodeError>;

    /// `GET {base}/chainweb/{api_version}/{node_version}/cut`
    async fn cut(
        &self,
        server: &str,
        api_version: &str,
        node_version: &str,
    ) -> Result<Cut, NodeError>;

    /// Non-committing exec against a single chain
    async fn local(
        &self,
        server: &str,
        node_version: &str,
        chain_id: &str,
        command: &LocalCommand,
    ) -> Result<LocalResponse, NodeError>;
}

/// Scheme and authority for `server`
///
/// Bare hosts are reached over https. A server given with an explicit
/// `http://` or `https://` prefix (a local devnet node) is used as is.
pub fn base_url(server: &str) -> String {
    if server.starts_with("https://") || server.starts_with("http://") {
        server.trim_end_matches('/').to_string()
    } else {
        format!("https://{server}")
    }
}

pub fn info_url(server: &str) -> String {
    format!("{}/info", base_url(server))
}

pub fn cut_url(server: &str, api_version: &str, node_version: &str) -> String {
    format!("{}/chainweb/{api_version}/{node_version}/cut", base_url(server))
}

/// Base of the per-chain pact service
pub fn chain_pact_url(server: &str, node_version: &str, chain_id: &str) -> String {
    format!(
        "{}/chainweb/{PACT_API_VERSION}/{node_version}/chain/{chain_id}/pact",
        base_url(server)
    )
}

pub fn local_url(server: &str, node_version: &str, chain_id: &str) -> String {
    format!("{}/api/v1/local", chain_pact_url(server, node_version, chain_id))
}
