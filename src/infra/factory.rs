use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{
    AvailabilityRepository, CalendarService, ContactDirectory, SchedulingInterpreter,
    SessionRepository, SlotPolicy, TenantRepository, UserRepository,
};
use crate::domain::services::{booking::BookingService, suggestion::SuggestionService};
use crate::infra::ai::{gemini_service::GeminiService, llm_interpreter::LlmInterpreter};
use crate::infra::calendar::google_calendar_service::GoogleCalendarService;
use crate::infra::repositories::{
    postgres_availability_repo::PostgresAvailabilityRepo, postgres_session_repo::PostgresSessionRepo,
    postgres_tenant_repo::PostgresTenantRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_availability_repo::SqliteAvailabilityRepo, sqlite_session_repo::SqliteSessionRepo,
    sqlite_tenant_repo::SqliteTenantRepo, sqlite_user_repo::SqliteUserRepo,
};

pub struct Repositories {
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactDirectory>,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
}

pub fn sqlite_repositories(pool: &SqlitePool) -> Repositories {
    let users = Arc::new(SqliteUserRepo::new(pool.clone()));
    Repositories {
        tenant_repo: Arc::new(SqliteTenantRepo::new(pool.clone())),
        user_repo: users.clone(),
        contacts: users,
        availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
        session_repo: Arc::new(SqliteSessionRepo::new(pool.clone())),
    }
}

pub fn postgres_repositories(pool: &PgPool) -> Repositories {
    let users = Arc::new(PostgresUserRepo::new(pool.clone()));
    Repositories {
        tenant_repo: Arc::new(PostgresTenantRepo::new(pool.clone())),
        user_repo: users.clone(),
        contacts: users,
        availability_repo: Arc::new(PostgresAvailabilityRepo::new(pool.clone())),
        session_repo: Arc::new(PostgresSessionRepo::new(pool.clone())),
    }
}

/// Wires both scheduling services from explicit collaborators.
pub fn assemble_state(
    config: &Config,
    repos: Repositories,
    interpreter: Arc<dyn SchedulingInterpreter>,
    calendar: Arc<dyn CalendarService>,
) -> AppState {
    let slot_policy = if config.enforce_unique_slots {
        SlotPolicy::RejectDuplicates
    } else {
        SlotPolicy::LastWriteWins
    };

    let booking_service = Arc::new(BookingService::new(
        repos.session_repo,
        repos.tenant_repo.clone(),
        repos.contacts,
        calendar,
        config.default_timezone.clone(),
        config.calendar_timeout,
        slot_policy,
    ));

    let suggestion_service = Arc::new(SuggestionService::new(
        repos.tenant_repo.clone(),
        repos.availability_repo.clone(),
        interpreter,
        config.default_timezone.clone(),
        config.ai_api_key.clone(),
        config.interpreter_timeout,
    ));

    AppState {
        config: config.clone(),
        tenant_repo: repos.tenant_repo,
        user_repo: repos.user_repo,
        availability_repo: repos.availability_repo,
        booking_service,
        suggestion_service,
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let interpreter = Arc::new(LlmInterpreter::new(Arc::new(GeminiService::new())));
    let calendar = Arc::new(GoogleCalendarService::new(
        config.calendar_api_url.clone(),
        config.calendar_api_token.clone(),
        config.calendar_id.clone(),
    ));

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_repositories(&pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_repositories(&pool)
    };

    assemble_state(config, repos, interpreter, calendar)
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
