//! Pact local exec construction
//!
//! Builds the read-only `details` lookup and the per-call metadata that
//! wraps it.

mod command;
mod meta;

pub use command::{hash_command, LocalCommand};
pub use meta::{QueryMetadata, CLOCK_SKEW_SECS, GAS_LIMIT, GAS_PRICE, SENDER, TTL_SECS};

use serde_json::Value;

/// `({token}.details "{account}")`
///
/// The account is JSON-quoted so it reaches Pact as a string literal.
/// The token must already have passed `is_module_reference`.
pub fn details_code(token: &str, account: &str) -> String {
    format!("({token}.details {})", Value::from(account))
}

/// True if `token` is a bare or namespaced module name such as `coin`
/// or `free.my-token`
pub fn is_module_reference(token: &str) -> bool {
    !token.is_empty()
        && !token.starts_with('.')
        && !token.ends_with('.')
        && !token.contains("..")
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
