use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::transition::{TransitionBounds, TransitionState};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/transition", get(current).post(trigger))
}

// GET /api/transition
async fn current(State(state): State<Arc<AppState>>) -> Json<TransitionState> {
    Json(state.transition.state())
}

// POST /api/transition
async fn trigger(
    State(state): State<Arc<AppState>>,
    Json(bounds): Json<TransitionBounds>,
) -> Json<TransitionState> {
    state.transition.trigger(bounds);
    Json(state.transition.state())
}
