//! Balance aggregation
//!
//! One read-only `details` lookup per chain, issued concurrently, folded
//! into a single total.

mod aggregator;
mod result;
mod value;

pub use aggregator::BalanceAggregator;
pub use result::{AggregateResponse, ShardBalanceResult, ShardStatus};
pub use value::{Balance, InvalidBalance};
