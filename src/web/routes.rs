//! Page route configuration.

use crate::state::AppState;
use crate::web::handlers::{inbox_handler, login_handler, portal_handler};
use axum::{Router, routing::get};

/// Pages the gateway lets anyone see.
///
/// # Endpoints
///
/// - `GET /login` - Login page
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/login", get(login_handler))
}

/// Pages for signed-in users.
///
/// # Endpoints
///
/// - `GET /portal` - Client portal
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/portal", get(portal_handler))
}

/// Pages for administrators.
///
/// # Endpoints
///
/// - `GET /admin/messages` - Unified inbox
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/messages", get(inbox_handler))
}
