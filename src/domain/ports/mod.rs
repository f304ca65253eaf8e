use crate::domain::models::{
    tenant::Tenant, user::User, availability::AvailabilityRule,
    session::{Session, SessionBooking, SessionIndexEntry, SessionStatus},
    suggestion::{InterpretationRequest, InterpreterOutput},
    calendar::CalendarEventRequest,
};
use crate::error::AppError;
use async_trait::async_trait;

/// How a booking commit treats an existing scheduled session for the same
/// teacher and start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Both bookings are committed as independent sessions.
    LastWriteWins,
    /// The commit is rejected with `AppError::Conflict` inside the transaction.
    RejectDuplicates,
}

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
}

/// Resolves a user id to the address calendar invites are sent to.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn resolve_contact_address(&self, tenant_id: &str, user_id: &str) -> Result<Option<String>, AppError>;
}

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn create(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError>;
    async fn list_by_teacher(&self, tenant_id: &str, teacher_id: &str) -> Result<Vec<AvailabilityRule>, AppError>;
    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Writes the session and both index entries in one transaction.
    /// Any failure leaves no record behind and surfaces as `AppError::StorageCommit`
    /// (or `AppError::Conflict` under `SlotPolicy::RejectDuplicates`).
    async fn commit_booking(&self, booking: &SessionBooking, policy: SlotPolicy) -> Result<Session, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Session>, AppError>;
    /// Touches only the `status` column of one session.
    async fn update_status(&self, tenant_id: &str, id: &str, status: SessionStatus) -> Result<Session, AppError>;
    async fn list_index_for_user(&self, tenant_id: &str, user_id: &str) -> Result<Vec<SessionIndexEntry>, AppError>;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        system_instruction: &str
    ) -> Result<String, AppError>;
}

/// Maps free text plus availability to candidate slots.
/// `Ok(None)` means the interpreter produced no output at all.
#[async_trait]
pub trait SchedulingInterpreter: Send + Sync {
    async fn interpret(&self, request: &InterpretationRequest) -> Result<Option<InterpreterOutput>, AppError>;
}

#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Creates the event on `owner_id`'s behalf and returns the external event id.
    async fn create_event(&self, owner_id: &str, event: &CalendarEventRequest) -> Result<String, AppError>;
}
