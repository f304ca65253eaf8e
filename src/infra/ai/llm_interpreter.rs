use std::sync::Arc;
use async_trait::async_trait;
use chrono_tz::Tz;
use serde_json::json;
use tracing::{error, instrument, warn};
use crate::domain::models::suggestion::{InterpretationRequest, InterpreterOutput};
use crate::domain::ports::{LlmService, SchedulingInterpreter};
use crate::domain::services::suggestion::{MAX_SUGGESTIONS, MIN_SUGGESTIONS};
use crate::error::AppError;

/// Interpreter backed by a text-generation model. The availability is
/// embedded in the prompt, the model only has to pick concrete slots.
pub struct LlmInterpreter {
    llm: Arc<dyn LlmService>,
}

impl LlmInterpreter {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }
}

fn system_instruction(request: &InterpretationRequest) -> String {
    let tz: Tz = request.time_zone.parse().unwrap_or(chrono_tz::UTC);
    let local_now = request.now.with_timezone(&tz);

    format!(
        r#"You are a scheduling assistant for a tutoring platform.
        Your task is to turn a student's free-text scheduling request into concrete session times.

        CONTEXT:
        - Current date and time: {} ({})
        - Every session lasts exactly 60 minutes.

        RULES:
        1. Only suggest start times inside the teacher's availability windows. The whole hour must end by the window's end time.
        2. Suggest between {} and {} slots, all in the future, interpreting relative phrases like "next week" or "Tuesday afternoon" from the current date.
        3. For every slot emit "isoTime" as an ISO-8601 date-time with the UTC offset of {} and "humanReadable" as a short friendly description.
        4. If nothing in the availability matches the request, suggest the closest available slots and explain why in the message.
        5. Output ONLY a JSON object of the form {{"suggestedTimes": [{{"humanReadable": "...", "isoTime": "..."}}], "responseMessage": "..."}}.
        "#,
        local_now.format("%A, %Y-%m-%d %H:%M"),
        request.time_zone,
        MIN_SUGGESTIONS,
        MAX_SUGGESTIONS,
        request.time_zone,
    )
}

fn user_prompt(request: &InterpretationRequest) -> String {
    let windows: Vec<_> = request.availability.iter()
        .map(|rule| json!({
            "dayOfWeek": rule.day_of_week,
            "day": rule.day_name(),
            "startTime": rule.start_time,
            "endTime": rule.end_time,
        }))
        .collect();

    format!(
        "Teacher availability (times are local to {}):\n{}\n\nStudent Request: {}",
        request.time_zone,
        serde_json::Value::Array(windows),
        request.student_request
    )
}

/// Blank text means the model produced nothing; anything else must be the JSON object.
pub fn parse_output(text: &str) -> Result<Option<InterpreterOutput>, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }

    serde_json::from_str::<InterpreterOutput>(trimmed)
        .map(Some)
        .map_err(|e| {
            error!("Interpreter output is not valid JSON: {}", e);
            AppError::GenerationFailure(format!("malformed interpreter output: {}", e))
        })
}

#[async_trait]
impl SchedulingInterpreter for LlmInterpreter {
    #[instrument(skip(self, request), fields(rules = request.availability.len()))]
    async fn interpret(&self, request: &InterpretationRequest) -> Result<Option<InterpreterOutput>, AppError> {
        let text = self.llm.generate(&request.api_key, &user_prompt(request), &system_instruction(request)).await?;
        let output = parse_output(&text)?;
        if output.is_none() {
            warn!("Interpreter returned an empty answer");
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::domain::models::availability::AvailabilityRule;

    fn request() -> InterpretationRequest {
        InterpretationRequest {
            api_key: "key".into(),
            student_request: "Monday morning please".into(),
            availability: vec![AvailabilityRule::new("t".into(), "T1".into(), 1, "09:00".into(), "12:00".into())],
            time_zone: "Europe/Berlin".into(),
            now: Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_parse_output_variants() {
        assert!(parse_output("").unwrap().is_none());
        assert!(parse_output("  null ").unwrap().is_none());
        assert!(matches!(parse_output("Sure! Monday works."), Err(AppError::GenerationFailure(_))));

        let parsed = parse_output(r#"{"suggestedTimes":[{"humanReadable":"Mon 9am","isoTime":"2025-03-10T09:00:00+01:00"}],"responseMessage":"Here you go"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.suggested_times.len(), 1);
        assert_eq!(parsed.response_message, "Here you go");

        let empty = parse_output(r#"{"suggestedTimes":[],"responseMessage":"Nothing fits"}"#).unwrap().unwrap();
        assert!(empty.suggested_times.is_empty());
    }

    #[test]
    fn test_prompt_carries_availability_and_request() {
        let req = request();
        let prompt = user_prompt(&req);
        assert!(prompt.contains("Monday"));
        assert!(prompt.contains("09:00"));
        assert!(prompt.contains("Monday morning please"));

        let system = system_instruction(&req);
        assert!(system.contains("Wednesday, 2025-03-05 13:00"));
        assert!(system.contains("Europe/Berlin"));
    }
}
