//! Per-call public metadata for local exec commands

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Placeholder gas payer; local execution never charges it
pub const SENDER: &str = "not-real";

/// Nominal gas price
pub const GAS_PRICE: f64 = 0.000_000_01;

pub const GAS_LIMIT: u64 = 6000;

/// Command time-to-live in seconds
pub const TTL_SECS: u64 = 600;

/// Creation time is backdated by this much to stay inside the node's
/// acceptance window when clocks drift.
pub const CLOCK_SKEW_SECS: u64 = 15;

/// Public metadata attached to a single command
///
/// Built fresh for every call. Nodes reject commands whose creation time
/// is outside `[now - ttl, now]`, so a cached value goes stale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    pub creation_time: u64,
    pub ttl: u64,
    pub gas_limit: u64,
    pub chain_id: String,
    pub gas_price: f64,
    pub sender: String,
}

impl QueryMetadata {
    /// Metadata for `chain_id` stamped with the current time
    pub fn for_chain(chain_id: &str) -> Self {
        Self::at(chain_id, SystemTime::now())
    }

    /// Metadata for `chain_id` stamped relative to `now`
    pub fn at(chain_id: &str, now: SystemTime) -> Self {
        let now_secs = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            creation_time: now_secs.saturating_sub(CLOCK_SKEW_SECS),
            ttl: TTL_SECS,
            gas_limit: GAS_LIMIT,
            chain_id: chain_id.to_string(),
            gas_price: GAS_PRICE,
            sender: SENDER.to_string(),
        }
    }
}
