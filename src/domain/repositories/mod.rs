//! Repository trait definitions for the domain layer.
//!
//! These traits are the persistent-store collaborator contracts consumed by
//! the message aggregator. Implementations live in
//! `crate::infrastructure::persistence`; mocks are generated by `mockall`.
//!
//! # Available Repositories
//!
//! - [`InternalMessageRepository`] - Internal messages
//! - [`ContactFormRepository`] - Contact-form submissions

pub mod contact_form_repository;
pub mod internal_message_repository;

pub use contact_form_repository::ContactFormRepository;
pub use internal_message_repository::InternalMessageRepository;

#[cfg(test)]
pub use contact_form_repository::MockContactFormRepository;
#[cfg(test)]
pub use internal_message_repository::MockInternalMessageRepository;
