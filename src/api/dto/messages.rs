//! DTOs for the admin message inbox.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pagination::{PageInfo, PaginationParams};
use crate::application::services::BulkUpdateReport;
use crate::domain::entities::{FeedSummary, MessageSource, MessageStatus, UnifiedMessage};

/// Query parameters of `GET /api/admin/messages`.
///
/// `source` and `status` are kept as strings so that unknown values produce
/// a JSON 400 from the handler.
#[derive(Debug, Default, Deserialize)]
pub struct MessageListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    pub source: Option<String>,

    pub status: Option<String>,
}

/// Unified feed page.
#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub items: Vec<UnifiedMessage>,
    /// Counters over the whole feed, before filters.
    pub summary: FeedSummary,
    pub pagination: PageInfo,
    /// True when one origin store could not be read.
    pub partial: bool,
    pub unavailable_sources: Vec<MessageSource>,
}

/// Body of `PATCH /api/admin/messages/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: MessageStatus,
}

/// Body of `PATCH /api/admin/messages/status`.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkUpdateStatusRequest {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 ids are required"))]
    pub ids: Vec<String>,

    pub status: MessageStatus,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub id: String,
    pub status: MessageStatus,
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateStatusResponse {
    pub status: MessageStatus,
    #[serde(flatten)]
    pub report: BulkUpdateReport,
}
