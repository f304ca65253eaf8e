use serde::Serialize;

/// Payload for the external calendar. Start and end are RFC 3339 strings
/// already shifted into `time_zone`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventRequest {
    pub summary: String,
    pub description: String,
    pub start_date_time: String,
    pub end_date_time: String,
    pub time_zone: String,
    pub attendees: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSyncResult {
    pub session_id: String,
    pub external_event_id: String,
}
