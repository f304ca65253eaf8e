use std::sync::Arc;
use crate::domain::ports::{AvailabilityRepository, TenantRepository, UserRepository};
use crate::domain::services::{booking::BookingService, suggestion::SuggestionService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub booking_service: Arc<BookingService>,
    pub suggestion_service: Arc<SuggestionService>,
}
