use crate::domain::{models::user::User, ports::{ContactDirectory, UserRepository}};
use crate::error::AppError;
use crate::infra::repositories::unique_or_database;
use async_trait::async_trait;
use sqlx::PgPool;

/// Tenant member directory. Also serves as the contact directory: a user's
/// invite address is their stored email.
pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let stored = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, tenant_id, display_name, email, role, created_at)
               VALUES ($1, $2, $3, $4, $5, $6)
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
impl ContactDirectory for PostgresUserRepo {
    async fn resolve_contact_address(&self, tenant_id: &str, user_id: &str) -> Result<Option<String>, AppError> {
        let email: Option<Option<String>> = sqlx::query_scalar("SELECT email FROM users WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(email.flatten())
    }
}
