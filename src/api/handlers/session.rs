use axum::{extract::{State, Path}, http::header, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::tenant::TenantId;
use crate::api::dtos::responses::UserSessionsResponse;
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;
use std::sync::Arc;

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.booking_service.get_session(&tenant_id, &session_id).await?;
    Ok(Json(session))
}

pub async fn cancel_session(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.booking_service.cancel_session(&tenant_id, &session_id).await?;
    Ok(Json(session))
}

pub async fn resync_calendar(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let result = state.booking_service.resync_calendar(&tenant_id, &session_id).await?;
    Ok(Json(result))
}

pub async fn export_ics(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.booking_service.get_session(&tenant_id, &session_id).await?;
    let disposition = format!("attachment; filename=\"session-{}.ics\"", session.id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        generate_ics(&session),
    ))
}

pub async fn list_user_sessions(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let sessions = state.booking_service.list_sessions_for_user(&tenant_id, &user_id).await?;
    Ok(Json(UserSessionsResponse { user_id, sessions }))
}
