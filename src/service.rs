//! Request-level balance lookup
//!
//! Validates caller input, resolves the topology once, then hands the chain
//! set to the aggregator. This is the whole contract the HTTP layer relies on.

use crate::balance::{AggregateResponse, BalanceAggregator};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::metrics::GatewayMetrics;
use crate::node::NodeApi;
use crate::pact;
use crate::topology::TopologyResolver;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Raw query parameters of `/api/balance`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalanceQuery {
    pub account: Option<String>,
    pub token: Option<String>,
    pub server: Option<String>,
}

/// Validated request with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRequest {
    pub account: String,
    pub token: String,
    pub server: String,
}

impl BalanceRequest {
    /// Apply defaults and reject unusable input
    pub fn from_query(query: BalanceQuery, config: &GatewayConfig) -> Result<Self, GatewayError> {
        let account = query
            .account
            .filter(|a| !a.is_empty())
            .ok_or(GatewayError::MissingAccount)?;

        let token = non_blank(query.token).unwrap_or_else(|| config.default_token.clone());
        if !pact::is_module_reference(&token) {
            return Err(GatewayError::InvalidToken { token });
        }

        let server = non_blank(query.server).unwrap_or_else(|| config.default_server.clone());

        Ok(Self {
            account,
            token,
            server,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Resolver plus aggregator sharing one node client
#[derive(Clone)]
pub struct BalanceService {
    config: Arc<GatewayConfig>,
    resolver: TopologyResolver,
    aggregator: BalanceAggregator,
}

impl BalanceService {
    pub fn new(
        config: Arc<GatewayConfig>,
        node: Arc<dyn NodeApi>,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        let resolver = TopologyResolver::new(Arc::clone(&node), Arc::clone(&metrics))
            .with_max_chain_count(config.max_chain_count);
        let aggregator = BalanceAggregator::new(node, config.shard_query_timeout, metrics);

        Self {
            config,
            resolver,
            aggregator,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Consolidated balance for the queried account
    ///
    /// Input errors are returned before any outbound call. Topology failure
    /// aborts the request; per-chain failures are reported inside the
    /// response.
    pub async fn balance(&self, query: BalanceQuery) -> Result<AggregateResponse, GatewayError> {
        let request = BalanceRequest::from_query(query, &self.config)?;

        let topology = self.resolver.resolve(&request.server).await?;

        let response = self
            .aggregator
            .aggregate(&request.server, &request.token, &request.account, &topology)
            .await;

        info!(
            account = %request.account,
            token = %request.token,
            server = %request.server,
            chains = response.chains.len(),
            total = %response.total_balance,
            "Balance aggregated"
        );

        Ok(response)
    }
}
