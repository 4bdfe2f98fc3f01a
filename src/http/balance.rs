//! Balance endpoint

use super::AppState;
use crate::balance::AggregateResponse;
use crate::error::GatewayError;
use crate::service::BalanceQuery;
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{error, info_span, warn, Instrument};
use uuid::Uuid;

/// `GET /api/balance?account=&token=&server=`
pub async fn balance_handler(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<AggregateResponse>, GatewayError> {
    let span = info_span!("balance", request_id = %Uuid::new_v4());

    let result = state.service.balance(query).instrument(span).await;

    match result {
        Ok(response) => {
            state.stats.record_response(&response);
            state.metrics.record_request("ok");
            Ok(Json(response))
        }
        Err(e) => {
            if e.is_client_error() {
                warn!(error = %e, "Rejected balance request");
                state.metrics.record_request("rejected");
            } else {
                error!(error = %e, source = ?std::error::Error::source(&e), "Balance request failed");
                state.metrics.record_request("failed");
            }
            state.stats.record_failed_request();
            state.metrics.record_error(&e);
            Err(e)
        }
    }
}
