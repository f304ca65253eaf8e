use tutoring_scheduler::{
    api::router::create_router,
    config::Config,
    domain::models::{
        availability::AvailabilityRule,
        calendar::CalendarEventRequest,
        suggestion::{InterpretationRequest, InterpreterOutput, SuggestedSlot},
        tenant::Tenant,
        user::User,
    },
    domain::ports::{CalendarService, SchedulingInterpreter},
    error::AppError,
    infra::factory::{assemble_state, sqlite_repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    Router,
};
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveTime, Utc, Weekday};
use tower::ServiceExt;
use serde_json::Value;

/// Interpreter double: answers with whatever the test configured.
#[derive(Default)]
pub struct StubInterpreter {
    output: Mutex<Option<InterpreterOutput>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<InterpretationRequest>>,
}

#[allow(dead_code)]
impl StubInterpreter {
    pub fn answer(&self, slots: &[&str], message: &str) {
        let suggested_times = slots.iter()
            .map(|iso| SuggestedSlot { human_readable: format!("Slot at {}", iso), iso_time: iso.to_string() })
            .collect();
        *self.output.lock().unwrap() = Some(InterpreterOutput {
            suggested_times,
            response_message: message.to_string(),
        });
    }

    pub fn answer_nothing(&self) {
        *self.output.lock().unwrap() = None;
    }

    pub fn delay_by(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<InterpretationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl SchedulingInterpreter for StubInterpreter {
    async fn interpret(&self, request: &InterpretationRequest) -> Result<Option<InterpreterOutput>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.output.lock().unwrap().clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum CalendarMode {
    #[default]
    Succeed,
    Fail,
    Hang,
}

/// Calendar double recording every event it was asked to create.
#[derive(Default)]
pub struct RecordingCalendar {
    mode: Mutex<CalendarMode>,
    events: Mutex<Vec<(String, CalendarEventRequest)>>,
}

#[allow(dead_code)]
impl RecordingCalendar {
    pub fn set_mode(&self, mode: CalendarMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn events(&self) -> Vec<(String, CalendarEventRequest)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarService for RecordingCalendar {
    async fn create_event(&self, owner_id: &str, event: &CalendarEventRequest) -> Result<String, AppError> {
        self.events.lock().unwrap().push((owner_id.to_string(), event.clone()));

        let mode = *self.mode.lock().unwrap();
        match mode {
            CalendarMode::Succeed => Ok(format!("evt_{}", Uuid::new_v4())),
            CalendarMode::Fail => Err(AppError::CalendarSync("provider unavailable".into())),
            CalendarMode::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too-late".to_string())
            }
        }
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub interpreter: Arc<StubInterpreter>,
    pub calendar: Arc<RecordingCalendar>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut config = Config {
            database_url: db_url.clone(),
            port: 0,
            default_timezone: "UTC".to_string(),
            ai_api_key: None,
            interpreter_timeout: Duration::from_secs(2),
            calendar_api_url: "http://localhost".to_string(),
            calendar_api_token: "token".to_string(),
            calendar_id: "primary".to_string(),
            calendar_timeout: Duration::from_millis(300),
            enforce_unique_slots: false,
        };
        customize(&mut config);

        let interpreter = Arc::new(StubInterpreter::default());
        let calendar = Arc::new(RecordingCalendar::default());

        let state = Arc::new(assemble_state(
            &config,
            sqlite_repositories(&pool),
            interpreter.clone(),
            calendar.clone(),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            interpreter,
            calendar,
        }
    }

    /// Tenant with an interpreter key and the given display zone.
    pub async fn create_tenant(&self, timezone: &str) -> String {
        let tenant = Tenant::new("Test Academy".to_string(), format!("academy-{}", Uuid::new_v4()))
            .with_timezone(timezone)
            .with_ai_api_key("test-key");
        self.state.tenant_repo.create(&tenant).await.unwrap().id
    }

    pub async fn create_user(&self, tenant_id: &str, id: &str, name: &str, email: Option<&str>, role: &str) {
        let mut user = User::new(tenant_id.to_string(), name.to_string(), email.map(str::to_string), role);
        user.id = id.to_string();
        self.state.user_repo.create(&user).await.unwrap();
    }

    /// Teacher T1 (Dana) and student S1 (Alex), both reachable by mail.
    pub async fn seed_participants(&self, tenant_id: &str) {
        self.create_user(tenant_id, "T1", "Dana", Some("dana@example.com"), "TEACHER").await;
        self.create_user(tenant_id, "S1", "Alex", Some("alex@example.com"), "STUDENT").await;
    }

    pub async fn add_availability(&self, tenant_id: &str, teacher_id: &str, day: i32, start: &str, end: &str) {
        let rule = AvailabilityRule::new(tenant_id.to_string(), teacher_id.to_string(), day, start.to_string(), end.to_string());
        self.state.availability_repo.create(&rule).await.unwrap();
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.send(method, uri, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Waits for the detached calendar task to report `expected` calls.
    pub async fn wait_for_calendar_calls(&self, expected: usize) -> Vec<(String, CalendarEventRequest)> {
        for _ in 0..50 {
            let events = self.calendar.events();
            if events.len() >= expected {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.calendar.events()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

/// Start of the next Monday strictly after today, at `hour:minute` UTC.
#[allow(dead_code)]
pub fn next_monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    let mut date = Utc::now().date_naive() + ChronoDuration::days(1);
    while date.weekday() != Weekday::Mon {
        date += ChronoDuration::days(1);
    }
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
    date.and_time(time).and_utc()
}

#[allow(dead_code)]
pub fn booking_payload(start_time: &str) -> Value {
    serde_json::json!({
        "startTime": start_time,
        "teacherId": "T1",
        "studentId": "S1",
        "courseId": "C1",
        "courseName": "Algebra",
        "studentName": "Alex",
        "teacherName": "Dana"
    })
}
