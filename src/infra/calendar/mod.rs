pub mod google_calendar_service;
