//! Repository trait for the contact-form store.

use crate::domain::entities::{ContactForm, ContactStatus, NewContactForm};
use crate::error::AppError;
use async_trait::async_trait;

/// Access to contact-form submissions.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgContactFormRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactFormRepository: Send + Sync {
    /// Returns every submission, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_all(&self) -> Result<Vec<ContactForm>, AppError>;

    /// Stores a new submission with status `NEW`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, form: NewContactForm) -> Result<ContactForm, AppError>;

    /// Sets the status of a submission by its raw id.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if a row was updated
    /// - `Ok(false)` if no submission has that id
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_status(&self, id: &str, status: ContactStatus) -> Result<bool, AppError>;
}
