//! Chainweb Balance Gateway
//!
//! HTTP service that aggregates an account's balance across all chains:
//! - Resolves the node's active chain topology per request
//! - Fans out read-only balance lookups to every chain
//! - Exposes health, stats and Prometheus metrics endpoints

use anyhow::Result;
use chainweb_balance_gateway::http::{self, AppState};
use chainweb_balance_gateway::metrics::GatewayMetrics;
use chainweb_balance_gateway::node::HttpNodeClient;
use chainweb_balance_gateway::stats::GatewayStats;
use chainweb_balance_gateway::{BalanceService, GatewayConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get log level
    let gateway_config = Arc::new(GatewayConfig::from_env()?);

    // Initialize tracing with configured log level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(
                    format!("chainweb_balance_gateway={}", gateway_config.log_level).parse()?,
                )
                .add_directive("tower_http=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .json()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        default_server = %gateway_config.default_server,
        default_token = %gateway_config.default_token,
        shard_query_timeout_secs = gateway_config.shard_query_timeout.as_secs(),
        "Starting Chainweb Balance Gateway"
    );

    let metrics = Arc::new(GatewayMetrics::install()?);
    info!("Prometheus metrics initialized");

    let node = Arc::new(HttpNodeClient::new(gateway_config.shard_query_timeout)?);

    let app_state = AppState {
        service: BalanceService::new(Arc::clone(&gateway_config), node, Arc::clone(&metrics)),
        stats: GatewayStats::new(),
        metrics,
    };

    let app = http::router(app_state);
    let addr: SocketAddr = ([0, 0, 0, 0], gateway_config.http_port).into();

    info!(port = gateway_config.http_port, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "HTTP server error");
        return Err(e.into());
    }

    info!("Gateway shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
