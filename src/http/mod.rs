//! HTTP surface
//!
//! `/api/balance` plus the operational endpoints.

mod balance;
mod health;

use crate::metrics::GatewayMetrics;
use crate::service::BalanceService;
use crate::stats::GatewayStats;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use health::HealthResponse;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: BalanceService,
    pub stats: GatewayStats,
    pub metrics: Arc<GatewayMetrics>,
}

/// Create the gateway router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/balance", get(balance::balance_handler))
        .route("/health", get(health::health_handler))
        .route("/stats", get(health::stats_handler))
        .route("/metrics", get(health::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
