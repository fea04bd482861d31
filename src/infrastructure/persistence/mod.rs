//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the origin store traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgInternalMessageRepository`] - Internal messages
//! - [`PgContactFormRepository`] - Contact-form submissions

pub mod pg_contact_form_repository;
pub mod pg_internal_message_repository;

pub use pg_contact_form_repository::PgContactFormRepository;
pub use pg_internal_message_repository::PgInternalMessageRepository;
