use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Directory entry for a tenant member. Credentials live with the external
/// identity provider; this table only carries what scheduling needs.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub tenant_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(tenant_id: String, display_name: String, email: Option<String>, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            display_name,
            email,
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }
}
