//! Prometheus metrics module
//!
//! Metrics go through the `metrics` facade; the Prometheus handle is only
//! needed to render `/metrics`.

use crate::balance::ShardStatus;
use crate::error::GatewayError;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;

/// Gateway metrics collector
#[derive(Clone)]
pub struct GatewayMetrics {
    handle: Arc<PrometheusHandle>,
}

impl GatewayMetrics {
    /// Install the Prometheus recorder globally and return a handle
    pub fn install() -> Result<Self, GatewayError> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(GatewayError::MetricsInstall)?;

        Self::register_metrics();

        Ok(Self {
            handle: Arc::new(handle),
        })
    }

    /// Collector whose recorder is not installed globally
    ///
    /// Recording calls become no-ops unless another recorder is installed.
    /// Used by tests and embedders that manage their own recorder.
    pub fn unregistered() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        Self {
            handle: Arc::new(recorder.handle()),
        }
    }

    /// Register metric descriptions
    fn register_metrics() {
        describe_counter!(
            "gateway_requests_total",
            Unit::Count,
            "Balance requests by outcome"
        );
        describe_counter!(
            "gateway_errors_total",
            Unit::Count,
            "Request-fatal errors by type"
        );
        describe_counter!(
            "gateway_shard_queries_total",
            Unit::Count,
            "Per-chain balance queries by status"
        );
        describe_counter!(
            "gateway_topology_resolutions_total",
            Unit::Count,
            "Topology resolutions by outcome"
        );
        describe_counter!(
            "gateway_cut_lookups_total",
            Unit::Count,
            "Cut endpoint lookups triggered by chain-count changes"
        );

        describe_histogram!(
            "gateway_shard_query_duration_seconds",
            Unit::Seconds,
            "Time to query one chain"
        );

        describe_gauge!(
            "gateway_active_chains",
            Unit::Count,
            "Chain count of the most recently resolved topology"
        );
    }

    /// Record a completed balance request
    pub fn record_request(&self, outcome: &'static str) {
        counter!("gateway_requests_total", "outcome" => outcome).increment(1);
    }

    /// Record a request-fatal error
    pub fn record_error(&self, error: &GatewayError) {
        counter!("gateway_errors_total", "error_type" => error.error_type_label()).increment(1);
    }

    /// Record one chain query
    pub fn record_shard_query(&self, chain_id: &str, status: ShardStatus, duration: Duration) {
        counter!(
            "gateway_shard_queries_total",
            "chain_id" => chain_id.to_string(),
            "status" => status.as_str()
        )
        .increment(1);

        histogram!(
            "gateway_shard_query_duration_seconds",
            "chain_id" => chain_id.to_string()
        )
        .record(duration.as_secs_f64());
    }

    /// Record a topology resolution
    pub fn record_topology(&self, outcome: &'static str, chain_count: usize) {
        counter!("gateway_topology_resolutions_total", "outcome" => outcome).increment(1);
        if chain_count > 0 {
            gauge!("gateway_active_chains").set(chain_count as f64);
        }
    }

    /// Record a cut lookup
    pub fn record_cut_lookup(&self) {
        counter!("gateway_cut_lookups_total").increment(1);
    }

    /// Render metrics in Prometheus format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_collector_accepts_records() {
        let metrics = GatewayMetrics::unregistered();

        metrics.record_request("ok");
        metrics.record_shard_query("0", ShardStatus::Success, Duration::from_millis(12));
        metrics.record_topology("canonical", 10);
        metrics.record_cut_lookup();
        metrics.record_error(&GatewayError::MissingAccount);

        // Nothing reaches an uninstalled recorder
        assert!(!metrics.render().contains("gateway_requests_total"));
    }
}
