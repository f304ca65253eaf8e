mod common;

use axum::http::{header, StatusCode};
use common::{booking_payload, CalendarMode, TestApp};
use std::time::{Duration, Instant};

async fn book(app: &TestApp, tid: &str) -> String {
    let (status, body) = app.send_json(
        "POST",
        &format!("/api/v1/{}/sessions", tid),
        Some(booking_payload("2025-03-10T14:00:00Z")),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    body["sessionId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_booking_sends_invite_in_tenant_zone() {
    let app = TestApp::new().await;
    let tid = app.create_tenant("America/New_York").await;
    app.seed_participants(&tid).await;

    book(&app, &tid).await;

    let events = app.wait_for_calendar_calls(1).await;
    assert_eq!(events.len(), 1);
    let (owner, event) = &events[0];
    assert_eq!(owner, "T1");
    assert_eq!(event.summary, "Tutoring Session: Algebra");
    assert!(event.description.contains("Dana"));
    assert!(event.description.contains("Alex"));
    assert_eq!(event.time_zone, "America/New_York");
    assert_eq!(event.start_date_time, "2025-03-10T10:00:00-04:00");
    assert_eq!(event.end_date_time, "2025-03-10T11:00:00-04:00");
    assert_eq!(event.attendees, vec!["dana@example.com".to_string(), "alex@example.com".to_string()]);
}

#[tokio::test]
async fn test_calendar_failure_keeps_booking_confirmed() {
    let app = TestApp::new().await;
    let tid = app.create_tenant("UTC").await;
    app.seed_participants(&tid).await;
    app.calendar.set_mode(CalendarMode::Fail);

    let session_id = book(&app, &tid).await;
    assert_eq!(app.wait_for_calendar_calls(1).await.len(), 1);

    let (status, session) = app.send_json("GET", &format!("/api/v1/{}/sessions/{}", tid, session_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["status"], "SCHEDULED");
    assert_eq!(app.count("session_index_entries").await, 2);
}

#[tokio::test]
async fn test_hanging_calendar_does_not_delay_booking() {
    let app = TestApp::new().await;
    let tid = app.create_tenant("UTC").await;
    app.seed_participants(&tid).await;
    app.calendar.set_mode(CalendarMode::Hang);

    let started = Instant::now();
    book(&app, &tid).await;
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(app.count("sessions").await, 1);
}

#[tokio::test]
async fn test_missing_contact_address_skips_invite() {
    let app = TestApp::new().await;
    let tid = app.create_tenant("UTC").await;
    app.create_user(&tid, "T1", "Dana", Some("dana@example.com"), "TEACHER").await;
    app.create_user(&tid, "S1", "Alex", None, "STUDENT").await;

    book(&app, &tid).await;

    assert!(app.wait_for_calendar_calls(1).await.is_empty());
    assert_eq!(app.count("sessions").await, 1);
}

#[tokio::test]
async fn test_manual_resync_reports_outcome() {
    let app = TestApp::new().await;
    let tid = app.create_tenant("UTC").await;
    app.seed_participants(&tid).await;
    let session_id = book(&app, &tid).await;
    app.wait_for_calendar_calls(1).await;
    let uri = format!("/api/v1/{}/sessions/{}/calendar-sync", tid, session_id);

    let (status, body) = app.send_json("POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], session_id.as_str());
    assert!(body["externalEventId"].as_str().unwrap().starts_with("evt_"));

    app.calendar.set_mode(CalendarMode::Fail);
    let (status, body) = app.send_json("POST", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Calendar sync failed");

    app.calendar.set_mode(CalendarMode::Hang);
    let started = Instant::now();
    let (status, _) = app.send_json("POST", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(started.elapsed() < Duration::from_secs(5), "resync is bounded by the calendar timeout");
}

#[tokio::test]
async fn test_resync_of_cancelled_session_conflicts() {
    let app = TestApp::new().await;
    let tid = app.create_tenant("UTC").await;
    app.seed_participants(&tid).await;
    let session_id = book(&app, &tid).await;

    app.send_json("POST", &format!("/api/v1/{}/sessions/{}/cancel", tid, session_id), None).await;

    let (status, _) = app.send_json("POST", &format!("/api/v1/{}/sessions/{}/calendar-sync", tid, session_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_ics_export() {
    let app = TestApp::new().await;
    let tid = app.create_tenant("UTC").await;
    app.seed_participants(&tid).await;
    let session_id = book(&app, &tid).await;

    let response = app.send("GET", &format!("/api/v1/{}/sessions/{}/invite.ics", tid, session_id), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/calendar"));
    let disposition = response.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap().to_string();
    assert!(disposition.contains(&session_id));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let ics = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("BEGIN:VEVENT"));
    assert!(ics.contains("Tutoring Session: Algebra"));
    assert!(ics.contains(&session_id));
}

#[tokio::test]
async fn test_contact_lookup_error_keeps_booking_confirmed() {
    let app = TestApp::new().await;
    let tid = app.create_tenant("UTC").await;
    app.seed_participants(&tid).await;

    sqlx::query("DROP TABLE users")
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app.send_json(
        "POST",
        &format!("/api/v1/{}/sessions", tid),
        Some(booking_payload("2025-03-10T14:00:00Z")),
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(!body["sessionId"].as_str().unwrap().is_empty());
    assert_eq!(app.count("sessions").await, 1);
    assert_eq!(app.count("session_index_entries").await, 2);
    assert!(app.wait_for_calendar_calls(1).await.is_empty());
}
