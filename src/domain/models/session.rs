use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use std::fmt;
use crate::error::AppError;

/// Every session is exactly this long; no input governs duration.
pub const SESSION_LENGTH_MINUTES: i64 = 60;

pub fn session_length() -> Duration {
    Duration::minutes(SESSION_LENGTH_MINUTES)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "SCHEDULED",
            SessionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SessionStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "SCHEDULED" => Ok(SessionStatus::Scheduled),
            "CANCELLED" => Ok(SessionStatus::Cancelled),
            other => Err(format!("unknown session status '{}'", other)),
        }
    }
}

/// Canonical record of one booked tutoring session.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(skip_serializing)]
    pub tenant_id: String,
    pub teacher_id: String,
    pub student_id: String,
    pub course_id: String,
    pub course_name: String,
    pub student_name: String,
    pub teacher_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_cancelled(&self) -> bool {
        self.status == SessionStatus::Cancelled
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexOwner {
    Student,
    Teacher,
}

impl IndexOwner {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexOwner::Student => "STUDENT",
            IndexOwner::Teacher => "TEACHER",
        }
    }
}

impl TryFrom<String> for IndexOwner {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "STUDENT" => Ok(IndexOwner::Student),
            "TEACHER" => Ok(IndexOwner::Teacher),
            other => Err(format!("unknown index owner '{}'", other)),
        }
    }
}

/// Denormalized "my sessions" pointer, one per participant.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionIndexEntry {
    #[serde(skip_serializing)]
    pub tenant_id: String,
    pub user_id: String,
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub owner: IndexOwner,
}

/// The three records a booking writes. Only constructed through
/// [`SessionBooking::new`], so both index entries always mirror the session.
#[derive(Debug, Clone)]
pub struct SessionBooking {
    session: Session,
    student_entry: SessionIndexEntry,
    teacher_entry: SessionIndexEntry,
}

impl SessionBooking {
    pub fn new(tenant_id: String, start: DateTime<Utc>, request: &SessionBookingRequest) -> Self {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.clone(),
            teacher_id: request.teacher_id.trim().to_string(),
            student_id: request.student_id.trim().to_string(),
            course_id: request.course_id.trim().to_string(),
            course_name: request.course_name.trim().to_string(),
            student_name: request.student_name.trim().to_string(),
            teacher_name: request.teacher_name.trim().to_string(),
            start_time: start,
            end_time: start + session_length(),
            status: SessionStatus::Scheduled,
            created_at: Utc::now(),
        };

        let entry_for = |user_id: &str, owner: IndexOwner| SessionIndexEntry {
            tenant_id: tenant_id.clone(),
            user_id: user_id.to_string(),
            session_id: session.id.clone(),
            start_time: session.start_time,
            owner,
        };

        let student_entry = entry_for(&session.student_id, IndexOwner::Student);
        let teacher_entry = entry_for(&session.teacher_id, IndexOwner::Teacher);

        Self { session, student_entry, teacher_entry }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn index_entries(&self) -> [&SessionIndexEntry; 2] {
        [&self.student_entry, &self.teacher_entry]
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionBookingRequest {
    pub start_time: String,
    pub teacher_id: String,
    pub student_id: String,
    pub course_id: String,
    pub course_name: String,
    pub student_name: String,
    pub teacher_name: String,
}

impl SessionBookingRequest {
    /// Checks every field and returns the parsed start instant.
    pub fn validate(&self) -> Result<DateTime<Utc>, AppError> {
        let required = [
            ("teacherId", &self.teacher_id),
            ("studentId", &self.student_id),
            ("courseId", &self.course_id),
            ("courseName", &self.course_name),
            ("studentName", &self.student_name),
            ("teacherName", &self.teacher_name),
        ];

        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::Validation(format!("{} must not be empty", field)));
        }

        DateTime::parse_from_rfc3339(self.start_time.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AppError::Validation("startTime must be an ISO-8601 date-time".into()))
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub success: bool,
    pub session_id: String,
}
