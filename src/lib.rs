//! Chainweb balance gateway
//!
//! Sums an account's token balance across every chain of a Chainweb node:
//! - Resolves the active chain set (10 canonical chains, or the grown graph
//!   once its activation height has passed)
//! - Queries every chain concurrently with a read-only local exec
//! - Degrades per-chain failures to `not_found`/`error` entries instead of
//!   failing the request

pub mod balance;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod node;
pub mod pact;
pub mod service;
pub mod stats;
pub mod topology;

pub use balance::{AggregateResponse, BalanceAggregator, ShardBalanceResult, ShardStatus};
pub use config::GatewayConfig;
pub use error::{GatewayError, NodeError};
pub use service::{BalanceQuery, BalanceService};
pub use topology::{ShardTopology, TopologyResolver};
