use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveTime, Timelike, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const MINUTES_PER_DAY: u32 = 1440;

/// A recurring weekly window during which a teacher can be booked.
///
/// `day_of_week` counts from Sunday (0) to Saturday (6). Times are wall-clock
/// `HH:MM` in the tenant's display zone. Overlapping rules are allowed.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRule {
    pub id: String,
    #[serde(skip_serializing)]
    pub tenant_id: String,
    pub teacher_id: String,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityRule {
    pub fn new(tenant_id: String, teacher_id: String, day_of_week: i32, start_time: String, end_time: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            teacher_id,
            day_of_week,
            start_time,
            end_time,
            created_at: Utc::now(),
        }
    }

    /// The rule as a half-open minute range `[start, end)` within its day.
    /// `None` when either bound is not a valid `HH:MM` time.
    pub fn minute_range(&self) -> Option<(u32, u32)> {
        let start = NaiveTime::parse_from_str(&self.start_time, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(&self.end_time, "%H:%M").ok()?;

        let start_idx = start.hour() * 60 + start.minute();
        let mut end_idx = end.hour() * 60 + end.minute();
        if end_idx == MINUTES_PER_DAY - 1 { end_idx = MINUTES_PER_DAY; }

        Some((start_idx, end_idx))
    }

    pub fn day_name(&self) -> &'static str {
        match self.day_of_week {
            0 => "Sunday",
            1 => "Monday",
            2 => "Tuesday",
            3 => "Wednesday",
            4 => "Thursday",
            5 => "Friday",
            6 => "Saturday",
            _ => "Unknown",
        }
    }
}
