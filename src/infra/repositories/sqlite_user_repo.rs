use crate::domain::{models::user::User, ports::{ContactDirectory, UserRepository}};
use crate::error::AppError;
use crate::infra::repositories::unique_or_database;
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Tenant member directory. Also serves as the contact directory: a user's
/// invite address is their stored email.
pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let stored = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, tenant_id, display_name, email, role, created_at)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&user.id).bind(&user.tenant_id).bind(&user.display_name)
            .bind(&user.email).bind(&user.role).bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_or_database(e, "User id already registered"))?;

        Ok(stored)
    }
}

#[async_trait]
impl ContactDirectory for SqliteUserRepo {
    async fn resolve_contact_address(&self, tenant_id: &str, user_id: &str) -> Result<Option<String>, AppError> {
        let email: Option<Option<String>> = sqlx::query_scalar("SELECT email FROM users WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(email.flatten())
    }
}
