//! In-memory Chainweb node for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chainweb_balance_gateway::metrics::GatewayMetrics;
use chainweb_balance_gateway::node::{self, Cut, LocalResponse, NodeApi, NodeInfo};
use chainweb_balance_gateway::pact::LocalCommand;
use chainweb_balance_gateway::NodeError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// How a chain answers a local exec
#[derive(Debug, Clone)]
pub enum ChainReply {
    /// `success` with this `data` payload
    Data(Value),
    /// `failure`, as for a missing row
    NotFound,
    /// Upstream error
    Fail(String),
    /// Never answers
    Hang,
}

impl ChainReply {
    pub fn balance(balance: Value) -> Self {
        Self::Data(json!({
            "account": "k:abc",
            "balance": balance,
            "guard": {"keys": ["abc"], "pred": "keys-all"}
        }))
    }
}

pub struct MockNode {
    info: Value,
    info_fails: bool,
    cut_height: u64,
    chains: HashMap<String, ChainReply>,
    default_reply: ChainReply,
    pub info_calls: AtomicUsize,
    pub cut_calls: AtomicUsize,
    pub local_calls: AtomicUsize,
    pub commands: Mutex<Vec<(String, LocalCommand)>>,
}

impl MockNode {
    /// Node reporting the ten-chain graph; every chain holds 1.0
    pub fn canonical() -> Self {
        let chains: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        Self::with_info(json!({
            "nodeApiVersion": "0.0",
            "nodeVersion": "mainnet01",
            "nodeChains": chains,
        }))
    }

    /// Node announcing a graph of `count` chains activating at `activation_height`
    pub fn grown(count: usize, activation_height: u64) -> Self {
        let chains: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let graph: Vec<Value> = (0..count).map(|i| json!([i, []])).collect();
        let old_graph: Vec<Value> = (0..10).map(|i| json!([i, []])).collect();
        Self::with_info(json!({
            "nodeApiVersion": "0.0",
            "nodeVersion": "mainnet01",
            "nodeChains": chains,
            "nodeGraphHistory": [[activation_height, graph], [0, old_graph]],
        }))
    }

    pub fn with_info(info: Value) -> Self {
        Self {
            info,
            info_fails: false,
            cut_height: 0,
            chains: HashMap::new(),
            default_reply: ChainReply::balance(json!(1.0)),
            info_calls: AtomicUsize::new(0),
            cut_calls: AtomicUsize::new(0),
            local_calls: AtomicUsize::new(0),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn cut_height(mut self, height: u64) -> Self {
        self.cut_height = height;
        self
    }

    pub fn chain(mut self, chain_id: &str, reply: ChainReply) -> Self {
        self.chains.insert(chain_id.to_string(), reply);
        self
    }

    pub fn default_reply(mut self, reply: ChainReply) -> Self {
        self.default_reply = reply;
        self
    }

    pub fn failing_info(mut self) -> Self {
        self.info_fails = true;
        self
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    pub fn cut_calls(&self) -> usize {
        self.cut_calls.load(Ordering::SeqCst)
    }

    pub fn local_calls(&self) -> usize {
        self.local_calls.load(Ordering::SeqCst)
    }

    pub fn outbound_calls(&self) -> usize {
        self.info_calls() + self.cut_calls() + self.local_calls()
    }
}

#[async_trait]
impl NodeApi for MockNode {
    async fn info(&self, server: &str) -> Result<NodeInfo, NodeError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        let url = node::info_url(server);

        if self.info_fails {
            return Err(NodeError::Status {
                url,
                status: 503,
                body: "service unavailable".to_string(),
            });
        }

        serde_json::from_value(self.info.clone()).map_err(|source| NodeError::Decode { url, source })
    }

    async fn cut(
        &self,
        _server: &str,
        _api_version: &str,
        _node_version: &str,
    ) -> Result<Cut, NodeError> {
        self.cut_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Cut {
            height: self.cut_height,
        })
    }

    async fn local(
        &self,
        server: &str,
        node_version: &str,
        chain_id: &str,
        command: &LocalCommand,
    ) -> Result<LocalResponse, NodeError> {
        self.local_calls.fetch_add(1, Ordering::SeqCst);
        self.commands
            .lock()
            .unwrap()
            .push((chain_id.to_string(), command.clone()));

        let reply = self
            .chains
            .get(chain_id)
            .unwrap_or(&self.default_reply)
            .clone();

        let body = match reply {
            ChainReply::Data(data) => json!({"result": {"status": "success", "data": data}}),
            ChainReply::NotFound => json!({
                "result": {"status": "failure", "error": {"message": "with-read: row not found"}}
            }),
            ChainReply::Fail(message) => {
                return Err(NodeError::Status {
                    url: node::local_url(server, node_version, chain_id),
                    status: 500,
                    body: message,
                })
            }
            ChainReply::Hang => std::future::pending().await,
        };

        Ok(serde_json::from_value(body).unwrap())
    }
}

pub fn metrics() -> Arc<GatewayMetrics> {
    Arc::new(GatewayMetrics::unregistered())
}
