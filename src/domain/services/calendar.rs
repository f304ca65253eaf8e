use chrono::SecondsFormat;
use chrono_tz::Tz;
use crate::domain::models::{calendar::CalendarEventRequest, session::Session};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

fn summary(session: &Session) -> String {
    format!("Tutoring Session: {}", session.course_name)
}

fn description(session: &Session) -> String {
    format!(
        "{} session between {} (teacher) and {} (student).",
        session.course_name, session.teacher_name, session.student_name
    )
}

/// Builds the external calendar payload with both instants expressed in `tz`.
pub fn build_calendar_event(session: &Session, tz: Tz, attendees: Vec<String>) -> CalendarEventRequest {
    CalendarEventRequest {
        summary: summary(session),
        description: description(session),
        start_date_time: session.start_time.with_timezone(&tz).to_rfc3339_opts(SecondsFormat::Secs, false),
        end_date_time: session.end_time.with_timezone(&tz).to_rfc3339_opts(SecondsFormat::Secs, false),
        time_zone: tz.name().to_string(),
        attendees,
    }
}

/// Generates an iCalendar (.ics) string for a session, for manual import
/// when the automatic invite is missing.
pub fn generate_ics(session: &Session) -> String {
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(&summary(session))
        .description(&description(session))
        .starts(session.start_time)
        .ends(session.end_time)
        .uid(&session.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
