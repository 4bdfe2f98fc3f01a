//! Wire types returned by Chainweb node endpoints

use serde::Deserialize;
use serde_json::Value;

/// Body of `GET /info`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub node_api_version: String,
    pub node_version: String,
    /// Chain identifiers the node currently serves
    #[serde(default)]
    pub node_chains: Option<Vec<Value>>,
    /// Chain graph epochs, newest first
    #[serde(default)]
    pub node_graph_history: Option<Vec<GraphEpoch>>,
}

/// One `[activationHeight, [[chainId, [adjacent...]], ...]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct GraphEpoch(pub u64, pub Vec<Value>);

impl GraphEpoch {
    /// Block height at which this graph takes effect
    pub fn activation_height(&self) -> u64 {
        self.0
    }

    /// Number of chains in this graph
    pub fn chain_count(&self) -> usize {
        self.1.len()
    }
}

/// Body of `GET /chainweb/{api}/{version}/cut`
#[derive(Debug, Clone, Deserialize)]
pub struct Cut {
    pub height: u64,
}

/// Body of a local exec response
#[derive(Debug, Clone, Deserialize)]
pub struct LocalResponse {
    pub result: PactResult,
}

/// Pact evaluation outcome
#[derive(Debug, Clone, Deserialize)]
pub struct PactResult {
    pub status: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl PactResult {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_without_optional_fields() {
        let info: NodeInfo = serde_json::from_str(
            r#"{"nodeApiVersion":"0.0","nodeVersion":"mainnet01"}"#,
        )
        .unwrap();

        assert_eq!(info.node_version, "mainnet01");
        assert!(info.node_chains.is_none());
        assert!(info.node_graph_history.is_none());
    }

    #[test]
    fn test_graph_history_epoch_shape() {
        let info: NodeInfo = serde_json::from_str(
            r#"{
                "nodeApiVersion": "0.0",
                "nodeVersion": "testnet04",
                "nodeChains": ["0", "1", "2"],
                "nodeNumberOfChains": 3,
                "nodeGraphHistory": [
                    [852054, [[0, [1, 2]], [1, [0, 2]], [2, [0, 1]]]],
                    [0, [[0, [1]], [1, [0]]]]
                ]
            }"#,
        )
        .unwrap();

        let history = info.node_graph_history.unwrap();
        assert_eq!(history[0].activation_height(), 852054);
        assert_eq!(history[0].chain_count(), 3);
        assert_eq!(history[1].activation_height(), 0);
        assert_eq!(info.node_chains.unwrap().len(), 3);
    }

    #[test]
    fn test_failure_result_is_not_success() {
        let response: LocalResponse = serde_json::from_str(
            r#"{"result":{"status":"failure","error":{"message":"row not found"}}}"#,
        )
        .unwrap();

        assert!(!response.result.is_success());
        assert!(response.result.data.is_none());
        assert!(response.result.error.is_some());
    }
}
