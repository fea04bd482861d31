//! Login page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use axum::response::IntoResponse;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub redirect: Option<String>,
}

/// Template for the login page.
///
/// Renders `templates/login.html`; `redirect` is carried in a hidden field so
/// the sign-in form returns the user to the page they were denied.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {
    redirect: String,
}

/// Keeps only same-site absolute paths (`/x`, never `//host` or `https://`).
fn safe_redirect(target: Option<String>) -> String {
    target
        .filter(|t| t.starts_with('/') && !t.starts_with("//") && !t.contains('\\'))
        .unwrap_or_else(|| "/portal".to_string())
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /login?redirect=%2Fadmin%2Fmessages`
pub async fn login_handler(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        redirect: safe_redirect(query.redirect),
    }
}
