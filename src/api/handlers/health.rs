use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::HealthResponse;
use std::sync::Arc;
use tracing::error;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.roster_repo.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok", database: "ok" })),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "degraded", database: "unavailable" }),
            )
        }
    }
}
