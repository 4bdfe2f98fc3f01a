//! Per-chain and aggregate balance results

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Outcome of one chain query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShardStatus {
    Success,
    /// Node answered but the account has no row on that chain
    NotFound,
    /// Transport, timeout or decode failure
    Error,
}

impl ShardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

/// Balance reported by one chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardBalanceResult {
    pub chain_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<Value>,
    pub status: ShardStatus,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ShardBalanceResult {
    pub fn success(chain_id: impl Into<String>, balance: Decimal, guard: Option<Value>) -> Self {
        Self {
            chain_id: chain_id.into(),
            balance,
            guard,
            status: ShardStatus::Success,
            error_detail: None,
        }
    }

    pub fn not_found(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            balance: Decimal::ZERO,
            guard: None,
            status: ShardStatus::NotFound,
            error_detail: None,
        }
    }

    pub fn error(chain_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            balance: Decimal::ZERO,
            guard: None,
            status: ShardStatus::Error,
            error_detail: Some(detail.into()),
        }
    }

    /// Success with zero balance and no guard
    ///
    /// A real account row always carries a guard, so this usually means the
    /// node returned `success` without the expected data.
    pub fn is_suspect(&self) -> bool {
        self.status == ShardStatus::Success && self.balance.is_zero() && self.guard.is_none()
    }
}

/// Consolidated balance across every queried chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    pub account: String,
    pub token: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_balance: Decimal,
    pub chains: Vec<ShardBalanceResult>,
}

impl AggregateResponse {
    /// Sum `chains` in order; failed chains carry zero and stay listed
    ///
    /// A chain whose balance would push the total past `Decimal::MAX` is
    /// turned into an `error` entry and left out of the sum.
    pub fn new(
        account: impl Into<String>,
        token: impl Into<String>,
        mut chains: Vec<ShardBalanceResult>,
    ) -> Self {
        let mut total_balance = Decimal::ZERO;

        for chain in &mut chains {
            match total_balance.checked_add(chain.balance) {
                Some(sum) => total_balance = sum,
                None => {
                    warn!(chain_id = %chain.chain_id, balance = %chain.balance, "Balance overflows total");
                    *chain = ShardBalanceResult::error(
                        chain.chain_id.clone(),
                        format!("balance {} overflows the aggregate total", chain.balance),
                    );
                }
            }
        }

        Self {
            account: account.into(),
            token: token.into(),
            total_balance,
            chains,
        }
    }

    /// Number of chains with the given status
    pub fn count(&self, status: ShardStatus) -> usize {
        self.chains.iter().filter(|c| c.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_includes_every_chain() {
        let response = AggregateResponse::new(
            "k:abc",
            "coin",
            vec![
                ShardBalanceResult::success("0", Decimal::new(15, 1), None),
                ShardBalanceResult::not_found("1"),
                ShardBalanceResult::error("2", "timeout"),
                ShardBalanceResult::success("3", Decimal::new(25, 1), Some(json!({"pred": "keys-all"}))),
            ],
        );

        assert_eq!(response.total_balance, Decimal::from(4));
        assert_eq!(response.chains.len(), 4);
        assert_eq!(response.count(ShardStatus::Success), 2);
        assert_eq!(response.count(ShardStatus::Error), 1);
    }

    #[test]
    fn test_overflowing_chain_becomes_error() {
        let huge = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let response = AggregateResponse::new(
            "k:abc",
            "coin",
            vec![
                ShardBalanceResult::success("0", huge, None),
                ShardBalanceResult::success("1", huge, None),
                ShardBalanceResult::success("2", Decimal::ONE, None),
            ],
        );

        assert_eq!(response.total_balance, huge + Decimal::ONE);
        assert_eq!(response.chains[0].status, ShardStatus::Success);
        assert_eq!(response.chains[1].status, ShardStatus::Error);
        assert_eq!(response.chains[1].balance, Decimal::ZERO);
        assert!(response.chains[1]
            .error_detail
            .as_deref()
            .unwrap()
            .contains("overflows"));
        assert_eq!(response.chains[2].status, ShardStatus::Success);
    }

    #[test]
    fn test_chain_json_shape() {
        let ok = serde_json::to_value(ShardBalanceResult::success(
            "0",
            Decimal::new(125, 1),
            Some(json!({"keys": ["abc"], "pred": "keys-all"})),
        ))
        .unwrap();
        assert_eq!(ok["chainId"], "0");
        assert_eq!(ok["balance"], 12.5);
        assert_eq!(ok["status"], "success");
        assert_eq!(ok["guard"]["pred"], "keys-all");
        assert!(ok.get("error").is_none());

        let missing = serde_json::to_value(ShardBalanceResult::not_found("3")).unwrap();
        assert_eq!(missing["status"], "not_found");
        assert_eq!(missing["balance"], 0.0);
        assert!(missing.get("guard").is_none());

        let failed = serde_json::to_value(ShardBalanceResult::error("4", "boom")).unwrap();
        assert_eq!(failed["status"], "error");
        assert_eq!(failed["error"], "boom");
    }

    #[test]
    fn test_suspect_success() {
        assert!(ShardBalanceResult::success("0", Decimal::ZERO, None).is_suspect());
        assert!(!ShardBalanceResult::success("0", Decimal::ONE, None).is_suspect());
        assert!(!ShardBalanceResult::not_found("0").is_suspect());
    }
}
