//! Application layer services.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Resolves the caller's identity claim
//! - [`services::message_service::MessageService`] - Unified operator feed and status write-back

pub mod services;
