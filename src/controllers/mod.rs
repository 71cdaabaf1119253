pub mod pages;
pub mod social;
pub mod transactions;
pub mod transition;

use axum::{http::StatusCode, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiError, MutationError, WalletError};
use crate::models::FlowAddress;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/pages", pages::routes())
        .merge(transactions::routes())
        .merge(social::routes())
        .merge(transition::routes())
}

/* ---------- ошибки ---------- */

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    success: bool,
    error: String,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

pub fn to_api_error(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody { success: false, error: message.to_string() }))
}

/// Ошибки backend: 4xx пробрасываем как есть, всё, что сломалось выше по цепочке, это 502.
pub fn upstream_error(e: &ApiError) -> (StatusCode, Json<ErrorBody>) {
    let status = match e {
        ApiError::Validation(_) | ApiError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
        ApiError::Http { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        _ => StatusCode::BAD_GATEWAY,
    };
    if status == StatusCode::BAD_GATEWAY {
        tracing::error!("Upstream failure: {}", e);
    }
    to_api_error(status, &e.to_string())
}

pub fn mutation_error(e: &MutationError) -> (StatusCode, Json<ErrorBody>) {
    match e {
        MutationError::Api(api) => upstream_error(api),
        MutationError::Wallet(WalletError::NotConnected) => to_api_error(StatusCode::UNAUTHORIZED, &e.to_string()),
        MutationError::Wallet(wallet) => to_api_error(StatusCode::BAD_GATEWAY, &wallet.to_string()),
    }
}

pub fn not_found(what: &str) -> (StatusCode, Json<ErrorBody>) {
    to_api_error(StatusCode::NOT_FOUND, &format!("{} not found", what))
}

/// Числовой ID из пути. Всё остальное - 400, чтобы сегмент не уводил запрос на другой endpoint backend'а.
pub fn parse_id(raw: &str, what: &str) -> ApiResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| to_api_error(StatusCode::BAD_REQUEST, &format!("Invalid {} id: {}", what, raw)))
}

/// Адрес из запроса: кривой адрес - это 400.
pub fn parse_address(raw: &str) -> ApiResult<FlowAddress> {
    FlowAddress::parse(raw).map_err(|e| upstream_error(&e))
}
