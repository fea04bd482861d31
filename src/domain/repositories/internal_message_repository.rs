//! Repository trait for the internal messaging store.

use crate::domain::entities::{InternalMessage, MessageStatus};
use crate::error::AppError;
use async_trait::async_trait;

/// Read and status write-back access to internal messages.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgInternalMessageRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InternalMessageRepository: Send + Sync {
    /// Returns every internal message, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_all(&self) -> Result<Vec<InternalMessage>, AppError>;

    /// Sets the status of a message by its raw id.
    ///
    /// Moving to `REPLIED` stamps `replied_at` if it was not set yet.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if a row was updated
    /// - `Ok(false)` if no message has that id
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_status(&self, id: &str, status: MessageStatus) -> Result<bool, AppError>;
}
