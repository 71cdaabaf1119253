use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::{not_found, to_api_error, ApiResult};
use crate::transactions::{TransactionKind, TransactionSnapshot};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/transactions", post(track_transaction))
        .route("/transactions/{tx_id}", get(get_transaction))
}

// POST /api/transactions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackTransactionRequest {
    pub kind: TransactionKind,
    pub tx_id: String,
}

/// Кошелёк подписал транзакцию сам, gateway только следит за статусом и сбрасывает кеш.
async fn track_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TrackTransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionSnapshot>)> {
    let tx_id = req.tx_id.trim();
    if tx_id.is_empty() {
        return Err(to_api_error(StatusCode::BAD_REQUEST, "txId must not be empty"));
    }

    info!("Tracking {} transaction {}", req.kind, tx_id);
    let tracker = state.transactions.track(req.kind, tx_id);
    Ok((StatusCode::ACCEPTED, Json(tracker.state().into())))
}

// GET /api/transactions/{tx_id}
async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(tx_id): Path<String>,
) -> ApiResult<Json<TransactionSnapshot>> {
    state
        .transactions
        .get(&tx_id)
        .map(|s| Json(s.into()))
        .ok_or_else(|| not_found("Transaction"))
}
