//! Handlers for the admin message inbox.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::messages::{
    BulkUpdateStatusRequest, BulkUpdateStatusResponse, MessageListQuery, MessageListResponse,
    UpdateStatusRequest, UpdateStatusResponse,
};
use crate::api::dto::pagination::{PageInfo, paginate};
use crate::domain::entities::{FeedSummary, MessageSource, MessageStatus};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the unified feed of internal messages and contact forms.
///
/// # Endpoint
///
/// `GET /api/admin/messages?source=CONTACT_FORM&status=UNREAD&page=1&page_size=25`
///
/// Filters and pagination are applied after the merge, so page boundaries
/// follow the unified order. `summary` always covers the unfiltered feed.
///
/// When one store is down the response is still 200 with `partial: true`
/// and the failed source in `unavailable_sources`.
///
/// # Errors
///
/// Returns 400 on an unknown `source` / `status` or invalid pagination.
/// Returns 500 if both stores fail.
pub async fn message_list_handler(
    State(state): State<AppState>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<MessageListResponse>, AppError> {
    let (page, page_size) = query
        .pagination
        .resolve()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let source = query
        .source
        .as_deref()
        .map(str::parse::<MessageSource>)
        .transpose()
        .map_err(|e| AppError::bad_request("Invalid source filter", json!({ "reason": e })))?;

    let status = query
        .status
        .as_deref()
        .map(|s| s.to_ascii_uppercase().parse::<MessageStatus>())
        .transpose()
        .map_err(|e| AppError::bad_request("Invalid status filter", json!({ "reason": e })))?;

    let feed = state.message_service.list_unified().await?;
    let summary = FeedSummary::from_feed(&feed.items);
    let partial = feed.is_partial();

    let filtered: Vec<_> = feed
        .items
        .into_iter()
        .filter(|m| source.is_none_or(|s| m.source == s))
        .filter(|m| status.is_none_or(|s| m.status == s))
        .collect();

    let total = filtered.len();

    Ok(Json(MessageListResponse {
        items: paginate(filtered, page, page_size),
        summary,
        pagination: PageInfo::new(page, page_size, total),
        partial,
        unavailable_sources: feed.unavailable,
    }))
}

/// Changes the status of one message.
///
/// # Endpoint
///
/// `PATCH /api/admin/messages/{id}/status`
///
/// `id` is the namespaced id from the feed (`contact_<id>` for contact forms).
///
/// # Errors
///
/// Returns 400 if the id is malformed.
/// Returns 404 if the origin store has no such record.
pub async fn update_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, AppError> {
    state
        .message_service
        .update_status(&id, payload.status)
        .await?;

    Ok(Json(UpdateStatusResponse {
        id,
        status: payload.status,
    }))
}

/// Changes the status of several messages.
///
/// # Endpoint
///
/// `PATCH /api/admin/messages/status`
///
/// Ids are processed independently; failures are reported per id and do not
/// stop the rest.
pub async fn bulk_update_status_handler(
    State(state): State<AppState>,
    Json(payload): Json<BulkUpdateStatusRequest>,
) -> Result<Json<BulkUpdateStatusResponse>, AppError> {
    payload.validate()?;

    let report = state
        .message_service
        .bulk_update_status(&payload.ids, payload.status)
        .await;

    if !report.failed.is_empty() {
        tracing::warn!(
            failed = report.failed.len(),
            updated = report.updated.len(),
            "Bulk status update partially failed"
        );
    }

    Ok(Json(BulkUpdateStatusResponse {
        status: payload.status,
        report,
    }))
}
