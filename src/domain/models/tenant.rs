use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A school or tutoring business. Every other record is scoped to one tenant.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub slug: String,
    /// IANA zone used to display session times. Falls back to the service default.
    pub timezone: Option<String>,
    #[serde(skip_serializing)]
    pub ai_api_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            timezone: None,
            ai_api_key: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_timezone(mut self, zone: &str) -> Self {
        self.timezone = Some(zone.to_string());
        self
    }

    pub fn with_ai_api_key(mut self, key: &str) -> Self {
        self.ai_api_key = Some(key.to_string());
        self
    }
}
