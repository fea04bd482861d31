//! Core domain entities for the operator inbox.
//!
//! # Entity Types
//!
//! - [`InternalMessage`] - A row of the internal messaging store
//! - [`ContactForm`] - A public contact-form submission
//! - [`UnifiedMessage`] - The normalized projection shown to operators
//!
//! The two origin stores use different status vocabularies; the lookup table
//! between them lives in [`unified_message`].

pub mod contact_form;
pub mod internal_message;
pub mod unified_message;

pub use contact_form::{ContactForm, ContactStatus, NewContactForm};
pub use internal_message::{InternalMessage, MessageStatus, Priority};
pub use unified_message::{
    CONTACT_ID_PREFIX, FeedSummary, MessageId, MessageIdError, MessageSource, OriginRecord,
    UnifiedMessage, contact_status_to_unified, merge_feed, unified_status_to_contact,
};
