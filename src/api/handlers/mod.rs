//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod contact;
pub mod fallback;
pub mod health;
pub mod messages;
pub mod portal;

pub use contact::contact_handler;
pub use fallback::not_found_handler;
pub use health::health_handler;
pub use messages::{bulk_update_status_handler, message_list_handler, update_status_handler};
pub use portal::me_handler;
