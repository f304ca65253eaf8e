use crate::domain::models::calendar::CalendarEventRequest;
use crate::domain::ports::CalendarService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, instrument};

/// Google Calendar v3 `events.insert` client. Invites go out to attendees
/// through `sendUpdates=all`.
pub struct GoogleCalendarService {
    client: Client,
    api_url: String,
    api_token: String,
    calendar_id: String,
}

impl GoogleCalendarService {
    pub fn new(api_url: String, api_token: String, calendar_id: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url,
            api_token,
            calendar_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime<'a> {
    date_time: &'a str,
    time_zone: &'a str,
}

#[derive(Serialize)]
struct Attendee<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrivateProperties<'a> {
    owner_id: &'a str,
}

#[derive(Serialize)]
struct ExtendedProperties<'a> {
    private: PrivateProperties<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventPayload<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventDateTime<'a>,
    end: EventDateTime<'a>,
    attendees: Vec<Attendee<'a>>,
    extended_properties: ExtendedProperties<'a>,
}

#[derive(Deserialize)]
struct CreatedEvent {
    id: String,
}

#[async_trait]
impl CalendarService for GoogleCalendarService {
    #[instrument(skip(self, event), fields(summary = %event.summary))]
    async fn create_event(&self, owner_id: &str, event: &CalendarEventRequest) -> Result<String, AppError> {
        if self.api_token.is_empty() {
            return Err(AppError::CalendarSync("calendar API token not configured".into()));
        }

        let payload = EventPayload {
            summary: &event.summary,
            description: &event.description,
            start: EventDateTime { date_time: &event.start_date_time, time_zone: &event.time_zone },
            end: EventDateTime { date_time: &event.end_date_time, time_zone: &event.time_zone },
            attendees: event.attendees.iter().map(|email| Attendee { email }).collect(),
            extended_properties: ExtendedProperties { private: PrivateProperties { owner_id } },
        };

        let url = format!("{}/calendars/{}/events", self.api_url.trim_end_matches('/'), self.calendar_id);

        let res = self.client.post(&url)
            .query(&[("sendUpdates", "all")])
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Calendar service connection error: {}", e);
                error!("{}", msg);
                AppError::CalendarSync(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Calendar service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::CalendarSync(msg));
        }

        let created: CreatedEvent = res.json().await
            .map_err(|e| AppError::CalendarSync(format!("Unreadable calendar response: {}", e)))?;
        Ok(created.id)
    }
}
