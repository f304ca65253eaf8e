use axum::{extract::{rejection::JsonRejection, State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::tenant::TenantId;
use crate::api::dtos::requests::CreateAvailabilityRequest;
use crate::domain::models::availability::AvailabilityRule;
use crate::domain::services::availability::validate_rule;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_availability(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, teacher_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let rules = state.availability_repo.list_by_teacher(&tenant_id, &teacher_id).await?;
    Ok(Json(rules))
}

pub async fn create_availability(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, teacher_id)): Path<(String, String)>,
    payload: Result<Json<CreateAvailabilityRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let rule = AvailabilityRule::new(
        tenant_id,
        teacher_id,
        payload.day_of_week,
        payload.start_time.trim().to_string(),
        payload.end_time.trim().to_string(),
    );
    validate_rule(&rule)?;

    let created = state.availability_repo.create(&rule).await?;
    info!("Availability rule {} added for teacher {}", created.id, created.teacher_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_availability(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, rule_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.availability_repo.delete(&tenant_id, &rule_id).await?;
    info!("Availability rule deleted: {}", rule_id);
    Ok(StatusCode::NO_CONTENT)
}
