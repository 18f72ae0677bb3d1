//! Liveness route handler

use axum::{extract::State, Json};

use crate::pricing::responses::HealthResponse;
use crate::AppState;

/// Liveness check with the number of open drafts
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        open_drafts: state.cache.stats().open_drafts,
    })
}
