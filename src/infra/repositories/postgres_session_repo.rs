use crate::domain::{
    models::session::{Session, SessionBooking, SessionIndexEntry, SessionStatus},
    ports::{SessionRepository, SlotPolicy},
};
use crate::error::AppError;
use crate::infra::repositories::commit_failure;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresSessionRepo {
    pool: PgPool,
}

impl PostgresSessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepo {
    async fn commit_booking(&self, booking: &SessionBooking, policy: SlotPolicy) -> Result<Session, AppError> {
        let session = booking.session();
        let mut tx = self.pool.begin().await.map_err(commit_failure)?;

        if policy == SlotPolicy::RejectDuplicates {
            // Concurrent commits for the same slot abort with a serialization failure.
            sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE").execute(&mut *tx).await.map_err(commit_failure)?;

            let taken: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sessions WHERE tenant_id = $1 AND teacher_id = $2 AND start_time = $3 AND status = 'SCHEDULED'"
            )
                .bind(&session.tenant_id)
                .bind(&session.teacher_id)
                .bind(session.start_time)
                .fetch_one(&mut *tx)
                .await
                .map_err(commit_failure)?;

            if taken > 0 {
                return Err(AppError::Conflict("Teacher already has a session at this time".into()));
            }
        }

        let created = sqlx::query_as::<_, Session>(
            r#"INSERT INTO sessions (id, tenant_id, teacher_id, student_id, course_id, course_name, student_name, teacher_name, start_time, end_time, status, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING *"#
        )
            .bind(&session.id).bind(&session.tenant_id).bind(&session.teacher_id).bind(&session.student_id)
            .bind(&session.course_id).bind(&session.course_name).bind(&session.student_name).bind(&session.teacher_name)
            .bind(session.start_time).bind(session.end_time).bind(session.status.as_str()).bind(session.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(commit_failure)?;

        for entry in booking.index_entries() {
            sqlx::query("INSERT INTO session_index_entries (tenant_id, user_id, session_id, start_time, owner) VALUES ($1, $2, $3, $4, $5)")
                .bind(&entry.tenant_id)
                .bind(&entry.user_id)
                .bind(&entry.session_id)
                .bind(entry.start_time)
                .bind(entry.owner.as_str())
                .execute(&mut *tx)
                .await
                .map_err(commit_failure)?;
        }

        tx.commit().await.map_err(commit_failure)?;
        Ok(created)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, tenant_id: &str, id: &str, status: SessionStatus) -> Result<Session, AppError> {
        sqlx::query_as::<_, Session>("UPDATE sessions SET status = $1 WHERE tenant_id = $2 AND id = $3 RETURNING *")
            .bind(status.as_str())
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Session not found".into()))
    }

    async fn list_index_for_user(&self, tenant_id: &str, user_id: &str) -> Result<Vec<SessionIndexEntry>, AppError> {
        sqlx::query_as::<_, SessionIndexEntry>(
            "SELECT * FROM session_index_entries WHERE tenant_id = $1 AND user_id = $2 ORDER BY start_time ASC"
        )
            .bind(tenant_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
