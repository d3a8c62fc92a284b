pub mod auth;
pub mod company;
pub mod credit;
pub mod message;
pub mod notification;
pub mod profile;
