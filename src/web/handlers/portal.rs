use askama::Template;
use askama_web::WebTemplate;
use axum::Extension;
use axum::response::IntoResponse;

use crate::domain::identity::IdentityClaim;

#[derive(Template, WebTemplate)]
#[template(path = "portal.html")]
struct PortalTemplate {
    email: String,
    role: String,
    is_admin: bool,
}

/// Client portal landing page.
///
/// # Endpoint
///
/// `GET /portal`
pub async fn portal_handler(Extension(identity): Extension<IdentityClaim>) -> impl IntoResponse {
    PortalTemplate {
        email: identity.email.clone().unwrap_or_default(),
        role: identity.role.to_string(),
        is_admin: identity.is_admin(),
    }
}
