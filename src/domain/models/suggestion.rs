use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::models::availability::AvailabilityRule;
use crate::error::AppError;

/// A candidate one-hour slot. `iso_time` is authoritative; `human_readable`
/// is display text only and is never parsed back into a time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedSlot {
    pub human_readable: String,
    pub iso_time: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTimesRequest {
    pub teacher_id: String,
    pub student_id: String,
    pub course_id: String,
    pub student_request: String,
}

impl SuggestTimesRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.teacher_id.trim().is_empty() {
            return Err(AppError::Validation("teacherId must not be empty".into()));
        }
        if self.student_id.trim().is_empty() {
            return Err(AppError::Validation("studentId must not be empty".into()));
        }
        if self.course_id.trim().is_empty() {
            return Err(AppError::Validation("courseId must not be empty".into()));
        }
        if self.student_request.trim().is_empty() {
            return Err(AppError::Validation("studentRequest must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTimesResponse {
    pub suggested_times: Vec<SuggestedSlot>,
    pub response_message: String,
}

/// Everything the interpreter needs in one call: availability is fetched
/// beforehand so the interpreter never performs I/O of its own.
#[derive(Debug, Clone)]
pub struct InterpretationRequest {
    pub api_key: String,
    pub student_request: String,
    pub availability: Vec<AvailabilityRule>,
    pub time_zone: String,
    pub now: DateTime<Utc>,
}

/// Raw interpreter answer, before the engine checks it against availability.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct InterpreterOutput {
    pub suggested_times: Vec<SuggestedSlot>,
    pub response_message: String,
}
