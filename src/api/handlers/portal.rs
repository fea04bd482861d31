//! Handlers for the client portal API.

use axum::{Extension, Json};

use crate::api::dto::portal::MeResponse;
use crate::domain::identity::IdentityClaim;

/// Returns the caller's identity claim.
///
/// # Endpoint
///
/// `GET /api/portal/me`
///
/// The gateway only lets authenticated callers through, so the claim in the
/// extensions is never anonymous here.
pub async fn me_handler(Extension(identity): Extension<IdentityClaim>) -> Json<MeResponse> {
    Json(identity.into())
}
