use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, scheduling, session, availability};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Scheduling
        .route("/api/v1/{tenant_id}/scheduling/suggestions", post(scheduling::suggest_session_times))
        .route("/api/v1/{tenant_id}/sessions", post(scheduling::book_session))

        // Sessions
        .route("/api/v1/{tenant_id}/sessions/{session_id}", get(session::get_session))
        .route("/api/v1/{tenant_id}/sessions/{session_id}/cancel", post(session::cancel_session))
        .route("/api/v1/{tenant_id}/sessions/{session_id}/calendar-sync", post(session::resync_calendar))
        .route("/api/v1/{tenant_id}/sessions/{session_id}/invite.ics", get(session::export_ics))
        .route("/api/v1/{tenant_id}/users/{user_id}/sessions", get(session::list_user_sessions))

        // Availability
        .route("/api/v1/{tenant_id}/teachers/{teacher_id}/availability", get(availability::list_availability).post(availability::create_availability))
        .route("/api/v1/{tenant_id}/availability/{rule_id}", delete(availability::delete_availability))

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
                        tenant_id = tracing::field::Empty,
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
