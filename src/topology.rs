//! Chain topology resolution
//!
//! Works out which chain ids a node currently serves. The network launched
//! with ten chains and has since grown; a node announces a pending or
//! completed graph change through `nodeChains` and `nodeGraphHistory`, and
//! only the cut height tells us whether the new graph is already active.

use crate::config::DEFAULT_MAX_CHAIN_COUNT;
use crate::error::{GatewayError, NodeError};
use crate::metrics::GatewayMetrics;
use crate::node::{self, GraphEpoch, NodeApi, NodeInfo};
use std::sync::Arc;
use tracing::{debug, info};

/// Chain count of the original network graph
pub const CANONICAL_CHAIN_COUNT: usize = 10;

/// Active chain set for one node, resolved per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardTopology {
    node_version: String,
    shard_ids: Vec<String>,
}

impl ShardTopology {
    /// Topology with chains `"0"..count-1`
    pub fn with_chain_count(node_version: impl Into<String>, count: usize) -> Self {
        Self {
            node_version: node_version.into(),
            shard_ids: (0..count).map(|id| id.to_string()).collect(),
        }
    }

    /// The original ten-chain topology
    pub fn canonical(node_version: impl Into<String>) -> Self {
        Self::with_chain_count(node_version, CANONICAL_CHAIN_COUNT)
    }

    pub fn node_version(&self) -> &str {
        &self.node_version
    }

    pub fn shard_ids(&self) -> &[String] {
        &self.shard_ids
    }

    pub fn len(&self) -> usize {
        self.shard_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shard_ids.is_empty()
    }
}

/// Resolves `ShardTopology` from a node's info and cut endpoints
#[derive(Clone)]
pub struct TopologyResolver {
    node: Arc<dyn NodeApi>,
    metrics: Arc<GatewayMetrics>,
    max_chain_count: usize,
}

impl TopologyResolver {
    pub fn new(node: Arc<dyn NodeApi>, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            node,
            metrics,
            max_chain_count: DEFAULT_MAX_CHAIN_COUNT,
        }
    }

    /// Reject announced graphs with more than `max` chains
    pub fn with_max_chain_count(mut self, max: usize) -> Self {
        self.max_chain_count = max;
        self
    }

    /// Resolve the active chain set served by `server`
    ///
    /// Makes one `/info` call, plus one `/cut` call only when the node
    /// reports a chain count other than ten. A graph larger than the
    /// configured maximum fails before the cut lookup.
    pub async fn resolve(&self, server: &str) -> Result<ShardTopology, GatewayError> {
        let result = self.resolve_inner(server).await;

        match &result {
            Ok((topology, outcome)) => self.metrics.record_topology(*outcome, topology.len()),
            Err(_) => self.metrics.record_topology("failed", 0),
        }

        result
            .map(|(topology, _)| topology)
            .map_err(|source| GatewayError::UpstreamUnavailable {
                server: server.to_string(),
                source,
            })
    }

    async fn resolve_inner(&self, server: &str) -> Result<(ShardTopology, &'static str), NodeError> {
        let info = self.node.info(server).await?;

        let announced = match info.node_chains.as_ref() {
            Some(chains) if chains.len() != CANONICAL_CHAIN_COUNT => chains.len(),
            _ => {
                debug!(server, node_version = %info.node_version, "Canonical topology");
                return Ok((ShardTopology::canonical(info.node_version), "canonical"));
            }
        };

        let epoch = latest_epoch(server, &info)?;
        let activation_height = epoch.activation_height();
        let chain_count = epoch.chain_count();

        if chain_count > self.max_chain_count {
            return Err(NodeError::Malformed {
                url: node::info_url(server),
                reason: format!(
                    "graph of {chain_count} chains exceeds the limit of {}",
                    self.max_chain_count
                ),
            });
        }

        self.metrics.record_cut_lookup();
        let cut = self
            .node
            .cut(server, &info.node_api_version, &info.node_version)
            .await?;

        if cut.height > activation_height {
            info!(
                server,
                announced,
                chains = chain_count,
                height = cut.height,
                activation_height,
                "Chain graph upgrade active"
            );
            Ok((
                ShardTopology::with_chain_count(info.node_version, chain_count),
                "upgraded",
            ))
        } else {
            info!(
                server,
                announced,
                height = cut.height,
                activation_height,
                "Chain graph upgrade pending"
            );
            Ok((ShardTopology::canonical(info.node_version), "pending"))
        }
    }
}

fn latest_epoch<'a>(server: &str, info: &'a NodeInfo) -> Result<&'a GraphEpoch, NodeError> {
    info.node_graph_history
        .as_ref()
        .and_then(|history| history.first())
        .ok_or_else(|| NodeError::Malformed {
            url: node::info_url(server),
            reason: "nodeChains deviates from 10 but nodeGraphHistory is empty".to_string(),
        })
}
