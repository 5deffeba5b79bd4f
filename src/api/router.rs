use axum::{
    body::Body,
    extract::Request,
    response::Redirect,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, activity};
use tower_http::{
    classify::ServerErrorsFailureClass,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub const LANDING_PAGE: &str = "/static/index.html";

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(|| async { Redirect::temporary(LANDING_PAGE) }))
        .route("/health", get(health::health_check))

        // Roster
        .route("/activities", get(activity::list_activities))
        .route("/activities/{activity_name}/signup", post(activity::signup))
        .route("/activities/{activity_name}/unregister", delete(activity::unregister))

        .nest_service("/static", static_files)

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
