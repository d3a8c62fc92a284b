pub mod approval_service;
pub mod auth;
pub mod company_service;
pub mod credit_service;
pub mod message_service;
pub mod notification_service;
pub mod profile_service;
