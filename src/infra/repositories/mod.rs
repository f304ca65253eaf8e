use crate::error::AppError;
use tracing::error;

pub mod sqlite_availability_repo;
pub mod sqlite_session_repo;
pub mod sqlite_tenant_repo;
pub mod sqlite_user_repo;

pub mod postgres_availability_repo;
pub mod postgres_session_repo;
pub mod postgres_tenant_repo;
pub mod postgres_user_repo;

/// Any error inside a booking transaction: nothing was persisted, the caller may retry.
pub(crate) fn commit_failure(e: sqlx::Error) -> AppError {
    error!("Booking transaction aborted: {:?}", e);
    AppError::StorageCommit(e.to_string())
}

/// Unique-key collisions become `Conflict`, everything else stays a database error.
pub(crate) fn unique_or_database(e: sqlx::Error, conflict: &str) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => AppError::Conflict(conflict.to_string()),
        _ => AppError::Database(e),
    }
}
