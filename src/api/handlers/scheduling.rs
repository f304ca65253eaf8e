use axum::{extract::{rejection::JsonRejection, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::tenant::TenantId;
use crate::domain::models::session::SessionBookingRequest;
use crate::domain::models::suggestion::SuggestTimesRequest;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn suggest_session_times(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    payload: Result<Json<SuggestTimesRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let response = state.suggestion_service.suggest_session_times(&tenant_id, payload).await?;
    Ok(Json(response))
}

pub async fn book_session(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    payload: Result<Json<SessionBookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let confirmation = state.booking_service.book_session(&tenant_id, payload).await?;
    info!("Session booked: {}", confirmation.session_id);
    Ok(Json(confirmation))
}
