// src/handlers/mod.rs

pub mod auth;
pub mod companies;
pub mod credit;
pub mod messages;
pub mod notifications;
pub mod profile;
pub mod registrations;
