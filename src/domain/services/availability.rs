use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::warn;
use crate::domain::models::availability::AvailabilityRule;
use crate::domain::models::session::{session_length, SESSION_LENGTH_MINUTES};
use crate::error::AppError;

/// Parses the tenant's zone, falling back to the service default and then UTC.
pub fn display_timezone(tenant_zone: Option<&str>, default_zone: &str) -> Tz {
    if let Some(zone) = tenant_zone {
        match zone.parse::<Tz>() {
            Ok(tz) => return tz,
            Err(_) => warn!("Ignoring unknown tenant timezone '{}'", zone),
        }
    }
    default_zone.parse().unwrap_or(chrono_tz::UTC)
}

pub fn validate_rule(rule: &AvailabilityRule) -> Result<(), AppError> {
    if !(0..=6).contains(&rule.day_of_week) {
        return Err(AppError::Validation("dayOfWeek must be between 0 (Sunday) and 6 (Saturday)".into()));
    }

    let (start, end) = rule.minute_range()
        .ok_or(AppError::Validation("startTime and endTime must use HH:MM".into()))?;

    if end <= start {
        return Err(AppError::Validation("endTime must be after startTime".into()));
    }
    if end - start < SESSION_LENGTH_MINUTES as u32 {
        return Err(AppError::Validation("window must fit at least one session".into()));
    }
    Ok(())
}

/// True when a full session starting at `start` lies inside at least one rule,
/// with the wall clock read in `tz`. The end is the real instant one session
/// later, so DST shifts and sub-minute starts are accounted for.
pub fn slot_fits_availability(rules: &[AvailabilityRule], start: DateTime<Utc>, tz: Tz) -> bool {
    let local_start = start.with_timezone(&tz);
    let local_end = (start + session_length()).with_timezone(&tz);
    let weekday = local_start.weekday().num_days_from_sunday() as i32;

    let midnight = local_start.date_naive().and_time(NaiveTime::MIN);
    let start_offset = local_start.naive_local() - midnight;
    let end_offset = local_end.naive_local() - midnight;

    rules.iter()
        .filter(|rule| rule.day_of_week == weekday)
        .filter_map(|rule| rule.minute_range())
        .any(|(win_start, win_end)| {
            start_offset >= Duration::minutes(win_start as i64)
                && end_offset <= Duration::minutes(win_end as i64)
        })
}
