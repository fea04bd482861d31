//! Business logic services for the application layer.

pub mod auth_service;
pub mod message_service;

pub use auth_service::AuthService;
pub use message_service::{BulkUpdateReport, MessageService, UnifiedFeed};
