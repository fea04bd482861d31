//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod contact;
pub mod health;
pub mod messages;
pub mod pagination;
pub mod portal;
