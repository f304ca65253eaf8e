use crate::domain::{models::tenant::Tenant, ports::TenantRepository};
use crate::error::AppError;
use crate::infra::repositories::unique_or_database;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresTenantRepo {
    pool: PgPool,
}

impl PostgresTenantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PostgresTenantRepo {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError> {
        let stored = sqlx::query_as::<_, Tenant>(
            r#"INSERT INTO tenants (id, name, slug, timezone, ai_api_key, created_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#
        )
            .bind(&tenant.id).bind(&tenant.name).bind(&tenant.slug)
            .bind(&tenant.timezone).bind(&tenant.ai_api_key).bind(tenant.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_or_database(e, "Tenant slug already in use"))?;

        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }
}
