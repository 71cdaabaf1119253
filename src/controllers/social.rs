use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{mutation_error, parse_address, parse_id, upstream_error, ApiResult};
use crate::api::events::CheckInResult;
use crate::error::ApiError;
use crate::transactions::CurrentUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events/{id}/check-in", post(check_in))
        .route("/moments/{id}/like", post(toggle_like))
        .route("/moments/{id}/comments", post(add_comment))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// Пусто - кошелёк не подключен.
    #[serde(default)]
    pub user_address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub user_address: String,
    pub content: String,
}

// POST /api/events/{id}/check-in
async fn check_in(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(req): Json<UserRequest>,
) -> ApiResult<Json<CheckInResult>> {
    let event_id = parse_id(&event_id, "event")?.to_string();
    let user = match req.user_address.as_deref().filter(|a| !a.trim().is_empty()) {
        Some(raw) => CurrentUser::connected(parse_address(raw)?),
        None => CurrentUser::anonymous(),
    };

    state
        .mutations
        .check_in(&user, &event_id)
        .await
        .map(Json)
        .map_err(|e| mutation_error(&e))
}

// POST /api/moments/{id}/like
async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Path(moment_id): Path<i64>,
    Json(req): Json<UserRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let address = parse_address(req.user_address.as_deref().unwrap_or_default())?;

    let result = state
        .mutations
        .toggle_like(moment_id, &address)
        .await
        .map_err(|e| upstream_error(&e))?;
    Ok(Json(json!({ "success": true, "data": result })))
}

// POST /api/moments/{id}/comments
async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(moment_id): Path<i64>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let address = parse_address(&req.user_address)?;
    if req.content.trim().is_empty() {
        return Err(upstream_error(&ApiError::Validation("comment must not be empty".to_string())));
    }

    let result = state
        .mutations
        .add_comment(moment_id, &address, req.content.trim())
        .await
        .map_err(|e| upstream_error(&e))?;
    Ok(Json(json!({ "success": true, "data": result })))
}
