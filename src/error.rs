use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Suggestion generation failed: {0}")]
    GenerationFailure(String),
    #[error("Storage commit failed: {0}")]
    StorageCommit(String),
    #[error("Calendar sync failed: {0}")]
    CalendarSync(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::GenerationFailure(msg) => {
                error!("Generation failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "Could not generate suggestions, please retry or pick a time manually".to_string())
            }
            AppError::StorageCommit(msg) => {
                error!("Storage commit failure: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Booking was not saved, please retry".to_string())
            }
            AppError::CalendarSync(msg) => {
                error!("Calendar sync failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "Calendar sync failed".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
