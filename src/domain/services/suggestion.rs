use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use crate::domain::models::suggestion::{
    InterpretationRequest, SuggestTimesRequest, SuggestTimesResponse, SuggestedSlot,
};
use crate::domain::ports::{AvailabilityRepository, SchedulingInterpreter, TenantRepository};
use crate::domain::services::availability::{display_timezone, slot_fits_availability};
use crate::error::AppError;

pub const MAX_SUGGESTIONS: usize = 5;
pub const MIN_SUGGESTIONS: usize = 3;

const NO_AVAILABILITY_MESSAGE: &str =
    "This teacher has no availability set up yet, so no session times can be suggested.";

/// Turns a free-text request into bookable one-hour slots. Never writes anything.
pub struct SuggestionService {
    tenant_repo: Arc<dyn TenantRepository>,
    availability_repo: Arc<dyn AvailabilityRepository>,
    interpreter: Arc<dyn SchedulingInterpreter>,
    default_timezone: String,
    fallback_api_key: Option<String>,
    timeout: Duration,
}

impl SuggestionService {
    pub fn new(
        tenant_repo: Arc<dyn TenantRepository>,
        availability_repo: Arc<dyn AvailabilityRepository>,
        interpreter: Arc<dyn SchedulingInterpreter>,
        default_timezone: String,
        fallback_api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self { tenant_repo, availability_repo, interpreter, default_timezone, fallback_api_key, timeout }
    }

    #[instrument(skip(self, request), fields(teacher_id = %request.teacher_id))]
    pub async fn suggest_session_times(&self, tenant_id: &str, request: SuggestTimesRequest) -> Result<SuggestTimesResponse, AppError> {
        request.validate()?;

        let tenant = self.tenant_repo.find_by_id(tenant_id).await?
            .ok_or(AppError::NotFound("Tenant not found".into()))?;

        let availability = self.availability_repo.list_by_teacher(tenant_id, request.teacher_id.trim()).await?;
        if availability.is_empty() {
            info!("No availability rules for teacher, skipping interpreter");
            return Ok(SuggestTimesResponse {
                suggested_times: Vec::new(),
                response_message: NO_AVAILABILITY_MESSAGE.to_string(),
            });
        }

        let api_key = tenant.ai_api_key.clone()
            .or_else(|| self.fallback_api_key.clone())
            .ok_or(AppError::Validation("AI API Key not configured for this tenant".into()))?;

        let tz = display_timezone(tenant.timezone.as_deref(), &self.default_timezone);
        let now = Utc::now();

        let interpretation = InterpretationRequest {
            api_key,
            student_request: request.student_request.trim().to_string(),
            availability,
            time_zone: tz.name().to_string(),
            now,
        };

        let output = tokio::time::timeout(self.timeout, self.interpreter.interpret(&interpretation))
            .await
            .map_err(|_| AppError::GenerationFailure(format!("interpreter did not answer within {:?}", self.timeout)))??
            .ok_or(AppError::GenerationFailure("interpreter produced no output".into()))?;

        let proposed = output.suggested_times.len();
        let suggested_times = retain_bookable(output.suggested_times, &interpretation, now);

        if suggested_times.len() < proposed {
            warn!("Dropped {} of {} unusable interpreter slots", proposed - suggested_times.len(), proposed);
        }
        if suggested_times.len() < MIN_SUGGESTIONS {
            warn!("Interpreter returned only {} usable slots", suggested_times.len());
        }

        info!("Suggested {} session times", suggested_times.len());
        Ok(SuggestTimesResponse {
            suggested_times,
            response_message: output.response_message,
        })
    }
}

/// Keeps slots whose machine time parses, lies in the future and fits a
/// whole session inside the teacher's availability. Duplicates by instant
/// are dropped and the list is capped at `MAX_SUGGESTIONS`.
fn retain_bookable(slots: Vec<SuggestedSlot>, request: &InterpretationRequest, now: DateTime<Utc>) -> Vec<SuggestedSlot> {
    let tz = display_timezone(Some(&request.time_zone), "UTC");
    let mut seen = HashSet::new();

    slots.into_iter()
        .filter(|slot| {
            let Ok(start) = DateTime::parse_from_rfc3339(slot.iso_time.trim()) else {
                warn!("Discarding slot with unparseable isoTime '{}'", slot.iso_time);
                return false;
            };
            let start = start.with_timezone(&Utc);
            start > now
                && slot_fits_availability(&request.availability, start, tz)
                && seen.insert(start)
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}
