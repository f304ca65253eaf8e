pub mod availability;
pub mod calendar;
pub mod session;
pub mod suggestion;
pub mod tenant;
pub mod user;
