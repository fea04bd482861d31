//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /health`                - Health check (public)
//! - `POST /api/contact`           - Contact form (public, `contact` bucket)
//! - `/api/portal/*`, `/portal`    - Signed-in users
//! - `/api/admin/*`, `/admin/*`    - Administrators
//! - `GET  /login`                 - Login page (public)
//! - anything else                 - JSON 404, after the gateway ran
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Gateway** - Identity, authorization, rate limiting, security headers
//! - **Path normalization** - Trailing slash handling, before the gateway
//!   sees the path

use crate::api;
use crate::api::handlers::{health_handler, not_found_handler};
use crate::api::middleware::{gateway, tracing};
use crate::state::AppState;
use crate::web;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes behind the gateway, without path normalization.
///
/// The gateway wraps the fallback too, so an unknown path under `/api/admin`
/// answers 401/403 to non-admins rather than revealing a 404.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(api::routes::public_routes())
        .merge(api::routes::protected_routes())
        .merge(api::routes::admin_routes())
        .merge(web::routes::public_routes())
        .merge(web::routes::protected_routes())
        .merge(web::routes::admin_routes())
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(state.clone(), gateway::layer))
        .layer(tracing::layer())
        .with_state(state)
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
