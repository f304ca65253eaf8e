use serde::Serialize;
use crate::domain::models::session::SessionIndexEntry;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSessionsResponse {
    pub user_id: String,
    pub sessions: Vec<SessionIndexEntry>,
}
