use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::EmailQuery;
use crate::api::dtos::responses::{to_activities_response, MessageResponse};
use crate::error::AppError;
use std::sync::Arc;
use tracing::debug;

pub async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let rosters = state.roster_service.list_activities().await?;
    debug!("Listing {} activities", rosters.len());
    Ok(Json(to_activities_response(rosters)))
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let message = state.roster_service.enroll(&activity_name, &query.email).await?;
    Ok(Json(MessageResponse { message }))
}

pub async fn unregister(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let message = state.roster_service.withdraw(&activity_name, &query.email).await?;
    Ok(Json(MessageResponse { message }))
}
