//! Operator inbox: the unified message feed and its write-backs.

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{
    ContactForm, MessageId, MessageSource, MessageStatus, NewContactForm, UnifiedMessage,
    merge_feed, unified_status_to_contact,
};
use crate::domain::repositories::{ContactFormRepository, InternalMessageRepository};
use crate::error::AppError;

/// Result of [`MessageService::list_unified`].
///
/// When one origin store fails the feed is still returned from the other,
/// and the failed source is listed in `unavailable`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedFeed {
    pub items: Vec<UnifiedMessage>,
    pub unavailable: Vec<MessageSource>,
}

impl UnifiedFeed {
    pub fn is_partial(&self) -> bool {
        !self.unavailable.is_empty()
    }
}

/// Outcome of a bulk status change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkUpdateReport {
    pub updated: Vec<String>,
    pub failed: Vec<BulkUpdateFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkUpdateFailure {
    pub id: String,
    pub error: String,
}

/// Service over the internal-message and contact-form stores.
///
/// The feed itself is a read-only projection; status changes go straight to
/// the origin store selected by the namespaced id.
pub struct MessageService {
    internal: Arc<dyn InternalMessageRepository>,
    contact: Arc<dyn ContactFormRepository>,
}

impl MessageService {
    /// Creates a new message service.
    pub fn new(
        internal: Arc<dyn InternalMessageRepository>,
        contact: Arc<dyn ContactFormRepository>,
    ) -> Self {
        Self { internal, contact }
    }

    /// Builds the unified, newest-first feed from both stores.
    ///
    /// Both stores are read concurrently. No pagination happens here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] only when both stores fail.
    pub async fn list_unified(&self) -> Result<UnifiedFeed, AppError> {
        let (internal, contact) = tokio::join!(self.internal.list_all(), self.contact.list_all());

        let mut unavailable = Vec::new();

        let internal = internal.unwrap_or_else(|e| {
            tracing::warn!("Internal message store unavailable: {}", e);
            metrics::counter!("message_feed_partial_total", "source" => "internal").increment(1);
            unavailable.push(MessageSource::Internal);
            Vec::new()
        });

        let contact = contact.unwrap_or_else(|e| {
            tracing::warn!("Contact form store unavailable: {}", e);
            metrics::counter!("message_feed_partial_total", "source" => "contact_form")
                .increment(1);
            unavailable.push(MessageSource::ContactForm);
            Vec::new()
        });

        if unavailable.len() == 2 {
            return Err(AppError::internal(
                "Message stores unavailable",
                json!({ "sources": ["INTERNAL", "CONTACT_FORM"] }),
            ));
        }

        Ok(UnifiedFeed {
            items: merge_feed(internal, contact),
            unavailable,
        })
    }

    /// Changes the status of one record identified by its namespaced id.
    ///
    /// Contact forms receive the status translated back into their own
    /// vocabulary (`ARCHIVED` is stored as `CLOSED`).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the id is malformed.
    /// Returns [`AppError::NotFound`] if the origin store has no such record.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn update_status(
        &self,
        namespaced_id: &str,
        status: MessageStatus,
    ) -> Result<(), AppError> {
        let id = MessageId::parse(namespaced_id).map_err(|e| {
            AppError::bad_request("Invalid message id", json!({ "id": namespaced_id, "reason": e.to_string() }))
        })?;

        let updated = match &id {
            MessageId::Internal(raw) => self.internal.update_status(raw, status).await?,
            MessageId::ContactForm(raw) => {
                self.contact
                    .update_status(raw, unified_status_to_contact(status))
                    .await?
            }
        };

        if !updated {
            return Err(AppError::not_found(
                "Message not found",
                json!({ "id": namespaced_id }),
            ));
        }

        tracing::info!(
            "Message {} ({}) set to {}",
            namespaced_id,
            id.source(),
            status
        );
        Ok(())
    }

    /// Applies [`MessageService::update_status`] to every id, collecting failures.
    pub async fn bulk_update_status(
        &self,
        ids: &[String],
        status: MessageStatus,
    ) -> BulkUpdateReport {
        let mut report = BulkUpdateReport::default();

        for id in ids {
            match self.update_status(id, status).await {
                Ok(()) => report.updated.push(id.clone()),
                Err(e) => report.failed.push(BulkUpdateFailure {
                    id: id.clone(),
                    error: e.to_string(),
                }),
            }
        }

        report
    }

    /// Stores a public contact-form submission.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn submit_contact_form(&self, form: NewContactForm) -> Result<ContactForm, AppError> {
        let created = self.contact.create(form).await?;
        tracing::info!("Contact form {} received", created.id);
        Ok(created)
    }
}
