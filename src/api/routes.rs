//! API route configuration.
//!
//! Access control is not attached here: the gateway in front of the whole
//! router classifies every path (see [`crate::gateway::AccessPolicy`]). The
//! split below mirrors that classification.

use crate::api::handlers::{
    bulk_update_status_handler, contact_handler, me_handler, message_list_handler,
    update_status_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Routes open to anonymous callers.
///
/// # Endpoints
///
/// - `POST /api/contact` - Submit a contact form
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/api/contact", post(contact_handler))
}

/// Routes for any authenticated caller.
///
/// # Endpoints
///
/// - `GET /api/portal/me` - The caller's identity claim
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/api/portal/me", get(me_handler))
}

/// Routes for administrators.
///
/// # Endpoints
///
/// - `GET   /api/admin/messages`             - Unified message feed
/// - `PATCH /api/admin/messages/status`      - Bulk status change
/// - `PATCH /api/admin/messages/{id}/status` - Status change of one message
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/messages", get(message_list_handler))
        .route(
            "/api/admin/messages/status",
            patch(bulk_update_status_handler),
        )
        .route(
            "/api/admin/messages/{id}/status",
            patch(update_status_handler),
        )
}
