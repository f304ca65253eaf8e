use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub default_timezone: String,
    pub ai_api_key: Option<String>,
    pub interpreter_timeout: Duration,
    pub calendar_api_url: String,
    pub calendar_api_token: String,
    pub calendar_id: String,
    pub calendar_timeout: Duration,
    pub enforce_unique_slots: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            default_timezone: env::var("DEFAULT_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
            ai_api_key: env::var("AI_API_KEY").ok().filter(|k| !k.is_empty()),
            interpreter_timeout: Duration::from_secs(
                env::var("INTERPRETER_TIMEOUT_SECS").unwrap_or_else(|_| "45".to_string()).parse().expect("INTERPRETER_TIMEOUT_SECS must be a number")
            ),
            calendar_api_url: env::var("CALENDAR_API_URL").unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string()),
            calendar_api_token: env::var("CALENDAR_API_TOKEN").unwrap_or_default(),
            calendar_id: env::var("CALENDAR_ID").unwrap_or_else(|_| "primary".to_string()),
            calendar_timeout: Duration::from_secs(
                env::var("CALENDAR_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string()).parse().expect("CALENDAR_TIMEOUT_SECS must be a number")
            ),
            enforce_unique_slots: env::var("ENFORCE_UNIQUE_SLOTS")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}
