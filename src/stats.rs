//! In-process query statistics
//!
//! Tracks per-chain query outcomes across requests for the `/stats`
//! endpoint. Purely observational; nothing on the request path reads it.

use crate::balance::{AggregateResponse, ShardStatus};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counters for a single chain
#[derive(Debug, Default)]
pub struct ChainStatsEntry {
    pub successes: AtomicU64,
    pub not_found: AtomicU64,
    pub errors: AtomicU64,
    pub last_error: Option<String>,
}

/// Shared statistics across all requests
#[derive(Debug, Clone)]
pub struct GatewayStats {
    inner: Arc<GatewayStatsInner>,
}

#[derive(Debug)]
struct GatewayStatsInner {
    chains: DashMap<String, ChainStatsEntry>,
    requests: AtomicU64,
    failed_requests: AtomicU64,
    last_chain_count: AtomicU64,
    started_at: Instant,
}

/// Point-in-time copy of one chain's counters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStatsSnapshot {
    pub chain_id: String,
    pub success: u64,
    pub not_found: u64,
    pub error: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Body of `/stats`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub uptime_secs: u64,
    pub requests: u64,
    pub failed_requests: u64,
    pub last_chain_count: u64,
    pub chains: Vec<ChainStatsSnapshot>,
}

impl Default for GatewayStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayStats {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GatewayStatsInner {
                chains: DashMap::new(),
                requests: AtomicU64::new(0),
                failed_requests: AtomicU64::new(0),
                last_chain_count: AtomicU64::new(0),
                started_at: Instant::now(),
            }),
        }
    }

    /// Fold a completed aggregate into the per-chain counters
    pub fn record_response(&self, response: &AggregateResponse) {
        self.inner.requests.fetch_add(1, Ordering::Relaxed);
        self.inner
            .last_chain_count
            .store(response.chains.len() as u64, Ordering::Relaxed);

        for chain in &response.chains {
            let mut entry = self.inner.chains.entry(chain.chain_id.clone()).or_default();
            match chain.status {
                ShardStatus::Success => {
                    entry.successes.fetch_add(1, Ordering::Relaxed);
                }
                ShardStatus::NotFound => {
                    entry.not_found.fetch_add(1, Ordering::Relaxed);
                }
                ShardStatus::Error => {
                    entry.errors.fetch_add(1, Ordering::Relaxed);
                    entry.last_error = chain.error_detail.clone();
                }
            }
        }
    }

    /// Count a request that failed before any chain was queried
    pub fn record_failed_request(&self) {
        self.inner.requests.fetch_add(1, Ordering::Relaxed);
        self.inner.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.inner.requests.load(Ordering::Relaxed)
    }

    /// Total `error` results across all chains
    pub fn total_chain_errors(&self) -> u64 {
        self.inner
            .chains
            .iter()
            .map(|e| e.errors.load(Ordering::Relaxed))
            .sum()
    }

    /// Snapshot with chains in numeric id order
    pub fn snapshot(&self) -> StatsSnapshot {
        let mut chains: Vec<ChainStatsSnapshot> = self
            .inner
            .chains
            .iter()
            .map(|e| ChainStatsSnapshot {
                chain_id: e.key().clone(),
                success: e.successes.load(Ordering::Relaxed),
                not_found: e.not_found.load(Ordering::Relaxed),
                error: e.errors.load(Ordering::Relaxed),
                last_error: e.last_error.clone(),
            })
            .collect();

        chains.sort_by(|a, b| {
            let key = |id: &str| id.parse::<u64>().unwrap_or(u64::MAX);
            key(&a.chain_id)
                .cmp(&key(&b.chain_id))
                .then_with(|| a.chain_id.cmp(&b.chain_id))
        });

        StatsSnapshot {
            uptime_secs: self.inner.started_at.elapsed().as_secs(),
            requests: self.inner.requests.load(Ordering::Relaxed),
            failed_requests: self.inner.failed_requests.load(Ordering::Relaxed),
            last_chain_count: self.inner.last_chain_count.load(Ordering::Relaxed),
            chains,
        }
    }
}
