use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, instrument, warn, Instrument};
use crate::domain::models::calendar::CalendarSyncResult;
use crate::domain::models::session::{
    BookingConfirmation, Session, SessionBooking, SessionBookingRequest, SessionIndexEntry, SessionStatus,
};
use crate::domain::ports::{CalendarService, ContactDirectory, SessionRepository, SlotPolicy, TenantRepository};
use crate::domain::services::availability::display_timezone;
use crate::domain::services::calendar::build_calendar_event;
use crate::error::AppError;

/// Commits bookings and owns the post-commit calendar hook.
#[derive(Clone)]
pub struct BookingService {
    session_repo: Arc<dyn SessionRepository>,
    tenant_repo: Arc<dyn TenantRepository>,
    contacts: Arc<dyn ContactDirectory>,
    calendar: Arc<dyn CalendarService>,
    default_timezone: String,
    calendar_timeout: Duration,
    slot_policy: SlotPolicy,
}

impl BookingService {
    pub fn new(
        session_repo: Arc<dyn SessionRepository>,
        tenant_repo: Arc<dyn TenantRepository>,
        contacts: Arc<dyn ContactDirectory>,
        calendar: Arc<dyn CalendarService>,
        default_timezone: String,
        calendar_timeout: Duration,
        slot_policy: SlotPolicy,
    ) -> Self {
        Self { session_repo, tenant_repo, contacts, calendar, default_timezone, calendar_timeout, slot_policy }
    }

    /// Validates, commits the session with both index entries, then hands the
    /// calendar invite to a detached task. The result depends only on the commit.
    #[instrument(skip(self, request), fields(teacher_id = %request.teacher_id, student_id = %request.student_id))]
    pub async fn book_session(&self, tenant_id: &str, request: SessionBookingRequest) -> Result<BookingConfirmation, AppError> {
        let start_time = request.validate()?;

        let booking = SessionBooking::new(tenant_id.to_string(), start_time, &request);

        info!("book_session: Committing session {} at {}", booking.session().id, start_time);
        let session = self.session_repo.commit_booking(&booking, self.slot_policy).await?;
        info!("book_session: Commit success: {}", session.id);

        self.spawn_calendar_sync(session.clone());

        Ok(BookingConfirmation {
            success: true,
            session_id: session.id,
        })
    }

    /// Moves a session to `Cancelled`. Cancelling twice is a no-op.
    #[instrument(skip(self))]
    pub async fn cancel_session(&self, tenant_id: &str, session_id: &str) -> Result<Session, AppError> {
        let session = self.get_session(tenant_id, session_id).await?;

        if session.is_cancelled() {
            info!("Session {} already cancelled", session_id);
            return Ok(session);
        }

        let cancelled = self.session_repo.update_status(tenant_id, session_id, SessionStatus::Cancelled).await?;
        info!("Session cancelled: {}", cancelled.id);
        Ok(cancelled)
    }

    pub async fn get_session(&self, tenant_id: &str, session_id: &str) -> Result<Session, AppError> {
        self.session_repo.find_by_id(tenant_id, session_id).await?
            .ok_or(AppError::NotFound("Session not found".into()))
    }

    pub async fn list_sessions_for_user(&self, tenant_id: &str, user_id: &str) -> Result<Vec<SessionIndexEntry>, AppError> {
        self.session_repo.list_index_for_user(tenant_id, user_id).await
    }

    /// Runs the calendar hook in the caller's task and reports the outcome,
    /// for re-syncing sessions whose automatic invite went missing.
    #[instrument(skip(self))]
    pub async fn resync_calendar(&self, tenant_id: &str, session_id: &str) -> Result<CalendarSyncResult, AppError> {
        let session = self.get_session(tenant_id, session_id).await?;
        if session.is_cancelled() {
            return Err(AppError::Conflict("Cancelled sessions are not synced to calendars".into()));
        }

        let external_event_id = self.sync_calendar_bounded(&session).await?;
        Ok(CalendarSyncResult {
            session_id: session.id,
            external_event_id,
        })
    }

    fn spawn_calendar_sync(&self, session: Session) {
        let service = self.clone();
        let span = info_span!("calendar_sync", session_id = %session.id);

        tokio::spawn(
            async move {
                match service.sync_calendar_bounded(&session).await {
                    Ok(event_id) => info!("Calendar event {} created", event_id),
                    Err(e) => warn!("Calendar sync skipped, booking stays confirmed: {}", e),
                }
            }
                .instrument(span),
        );
    }

    async fn sync_calendar_bounded(&self, session: &Session) -> Result<String, AppError> {
        tokio::time::timeout(self.calendar_timeout, self.sync_calendar(session))
            .await
            .map_err(|_| AppError::CalendarSync(format!("timed out after {:?}", self.calendar_timeout)))?
    }

    async fn sync_calendar(&self, session: &Session) -> Result<String, AppError> {
        let teacher_email = self.resolve_address(session, &session.teacher_id).await?;
        let student_email = self.resolve_address(session, &session.student_id).await?;

        let tenant_zone = self.tenant_repo.find_by_id(&session.tenant_id).await
            .map_err(|e| AppError::CalendarSync(format!("tenant lookup failed: {}", e)))?
            .and_then(|t| t.timezone);
        let tz = display_timezone(tenant_zone.as_deref(), &self.default_timezone);

        let event = build_calendar_event(session, tz, vec![teacher_email, student_email]);

        self.calendar.create_event(&session.teacher_id, &event).await
            .map_err(|e| {
                error!("Calendar provider rejected event: {}", e);
                AppError::CalendarSync(e.to_string())
            })
    }

    async fn resolve_address(&self, session: &Session, user_id: &str) -> Result<String, AppError> {
        self.contacts.resolve_contact_address(&session.tenant_id, user_id).await
            .map_err(|e| AppError::CalendarSync(format!("contact lookup for {} failed: {}", user_id, e)))?
            .filter(|address| !address.trim().is_empty())
            .ok_or_else(|| AppError::CalendarSync(format!("no contact address for {}", user_id)))
    }
}
