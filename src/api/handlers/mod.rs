pub mod availability;
pub mod health;
pub mod scheduling;
pub mod session;
