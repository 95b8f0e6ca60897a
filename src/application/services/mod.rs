pub mod notification_service;
pub mod preferences_service;
