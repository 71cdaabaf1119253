use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{not_found, parse_address, parse_id, upstream_error, ApiResult};
use crate::pages::{AdminPage, EventDetailPage, HomePage, MarketplacePage, ProfilePage, SearchPage, TicketsPage};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/home", get(home))
        .route("/events/{id}", get(event_detail))
        .route("/marketplace", get(marketplace))
        .route("/search", get(search))
        .route("/tickets", get(tickets))
        .route("/users/{address}", get(user_profile))
        .route("/admin", get(admin))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    pub viewer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub address: String,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub moments_page: Option<u32>,
    pub accessories_page: Option<u32>,
}

// GET /api/pages/home
async fn home(State(state): State<Arc<AppState>>) -> ApiResult<Json<HomePage>> {
    state.pages.home().await.map(Json).map_err(|e| upstream_error(&e))
}

// GET /api/pages/events/{id}?viewer=
async fn event_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ViewerQuery>,
) -> ApiResult<Json<EventDetailPage>> {
    // Пустой viewer - это анонимный просмотр
    let viewer = match params.viewer.as_deref().filter(|v| !v.trim().is_empty()) {
        Some(raw) => Some(parse_address(raw)?),
        None => None,
    };

    let id = parse_id(&id, "event")?;
    match state.pages.event_detail(id, viewer.as_ref()).await {
        Ok(Some(page)) => Ok(Json(page)),
        Ok(None) => Err(not_found("Event")),
        Err(e) => Err(upstream_error(&e)),
    }
}

// GET /api/pages/marketplace?page=
async fn marketplace(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<MarketplacePage>> {
    let page = params.page.unwrap_or(1);
    state.pages.marketplace(page).await.map(Json).map_err(|e| upstream_error(&e))
}

// GET /api/pages/search?q=
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<SearchPage>> {
    let term = params.q.unwrap_or_default();
    state.pages.search(&term).await.map(Json).map_err(|e| upstream_error(&e))
}

// GET /api/pages/tickets?address=&page=
async fn tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OwnerQuery>,
) -> ApiResult<Json<TicketsPage>> {
    let owner = parse_address(&params.address)?;
    let page = params.page.unwrap_or(1);
    state.pages.tickets(&owner, page).await.map(Json).map_err(|e| upstream_error(&e))
}

// GET /api/pages/users/{address}?momentsPage=&accessoriesPage=
async fn user_profile(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(params): Query<ProfileQuery>,
) -> ApiResult<Json<ProfilePage>> {
    let address = parse_address(&address)?;
    state
        .pages
        .user_profile(&address, params.moments_page.unwrap_or(1), params.accessories_page.unwrap_or(1))
        .await
        .map(Json)
        .map_err(|e| upstream_error(&e))
}

// GET /api/pages/admin?address=&page=
async fn admin(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OwnerQuery>,
) -> ApiResult<Json<AdminPage>> {
    let host = parse_address(&params.address)?;
    let page = params.page.unwrap_or(1);
    state.pages.admin(&host, page).await.map(Json).map_err(|e| upstream_error(&e))
}
