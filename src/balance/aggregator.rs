//! Parallel per-chain balance aggregation

use super::{AggregateResponse, Balance, InvalidBalance, ShardBalanceResult};
use crate::error::NodeError;
use crate::metrics::GatewayMetrics;
use crate::node::{NodeApi, PactResult};
use crate::pact::{self, LocalCommand, QueryMetadata};
use crate::topology::ShardTopology;
use futures::future::join_all;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Anything that turns a single chain query into an `error` entry
#[derive(Error, Debug)]
enum ShardQueryError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("query timed out after {0}s")]
    TimedOut(u64),

    #[error(transparent)]
    Balance(#[from] InvalidBalance),
}

/// Fans balance queries out to every chain of a topology
#[derive(Clone)]
pub struct BalanceAggregator {
    node: Arc<dyn NodeApi>,
    timeout: Duration,
    metrics: Arc<GatewayMetrics>,
}

impl BalanceAggregator {
    /// `timeout` bounds each chain query independently
    pub fn new(node: Arc<dyn NodeApi>, timeout: Duration, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            node,
            timeout,
            metrics,
        }
    }

    /// Query every chain concurrently and sum the results
    ///
    /// Never fails: each chain resolves to `success`, `not_found` or
    /// `error`, including chains whose balance would overflow the total.
    /// `chains` follows the order of `topology.shard_ids()`.
    pub async fn aggregate(
        &self,
        server: &str,
        token: &str,
        account: &str,
        topology: &ShardTopology,
    ) -> AggregateResponse {
        let queries = topology.shard_ids().iter().map(|shard_id| {
            self.query_shard(server, topology.node_version(), token, account, shard_id)
        });

        let chains = join_all(queries).await;
        AggregateResponse::new(account, token, chains)
    }

    /// Balance of `account` on a single chain
    pub async fn query_shard(
        &self,
        server: &str,
        node_version: &str,
        token: &str,
        account: &str,
        shard_id: &str,
    ) -> ShardBalanceResult {
        let start = Instant::now();

        let result = match self.execute(server, node_version, token, account, shard_id).await {
            Ok(result) => result,
            Err(e) => {
                warn!(chain_id = shard_id, server, error = %e, "Chain balance query failed");
                ShardBalanceResult::error(shard_id, e.to_string())
            }
        };

        if result.is_suspect() {
            debug!(chain_id = shard_id, "Success without balance or guard");
        }

        self.metrics
            .record_shard_query(shard_id, result.status, start.elapsed());
        result
    }

    async fn execute(
        &self,
        server: &str,
        node_version: &str,
        token: &str,
        account: &str,
        shard_id: &str,
    ) -> Result<ShardBalanceResult, ShardQueryError> {
        let code = pact::details_code(token, account);
        let command = LocalCommand::exec(&code, &QueryMetadata::for_chain(shard_id))?;

        let response = tokio::time::timeout(
            self.timeout,
            self.node.local(server, node_version, shard_id, &command),
        )
        .await
        .map_err(|_| ShardQueryError::TimedOut(self.timeout.as_secs()))??;

        interpret(shard_id, response.result)
    }
}

fn interpret(shard_id: &str, result: PactResult) -> Result<ShardBalanceResult, ShardQueryError> {
    if !result.is_success() {
        debug!(chain_id = shard_id, status = %result.status, error = ?result.error, "No balance row");
        return Ok(ShardBalanceResult::not_found(shard_id));
    }

    let data = result.data.unwrap_or_default();

    let balance = match data.get("balance").and_then(Balance::from_json) {
        Some(balance) => balance.normalize()?,
        None => Decimal::ZERO,
    };

    let guard = data.get("guard").filter(|g| !g.is_null()).cloned();

    Ok(ShardBalanceResult::success(shard_id, balance, guard))
}
