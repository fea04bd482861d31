//! Admin inbox page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::domain::entities::{FeedSummary, MessageSource, UnifiedMessage};
use crate::error::AppError;
use crate::state::AppState;

/// Rows shown on the page. The JSON API paginates the full feed.
const INBOX_PAGE_SIZE: usize = 100;

/// Flattened row, pre-formatted for the template.
struct InboxRow {
    id: String,
    source: &'static str,
    sender: String,
    subject: String,
    status: &'static str,
    priority: &'static str,
    received: String,
}

impl From<&UnifiedMessage> for InboxRow {
    fn from(m: &UnifiedMessage) -> Self {
        Self {
            id: m.id.clone(),
            source: match m.source {
                MessageSource::Internal => "Interno",
                MessageSource::ContactForm => "Contacto",
            },
            sender: format!("{} <{}>", m.sender_name, m.sender_email),
            subject: m.subject.clone(),
            status: m.status.as_str(),
            priority: m.priority.as_str(),
            received: m.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Template for the admin inbox.
///
/// Renders `templates/admin_messages.html` with the summary counters, a
/// warning banner when a store is down and the newest rows of the feed.
#[derive(Template, WebTemplate)]
#[template(path = "admin_messages.html")]
struct InboxTemplate {
    summary: FeedSummary,
    rows: Vec<InboxRow>,
    unavailable: Vec<String>,
}

/// Renders the unified inbox.
///
/// # Endpoint
///
/// `GET /admin/messages`
///
/// # Errors
///
/// Returns 500 if both stores fail.
pub async fn inbox_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let feed = state.message_service.list_unified().await?;

    Ok(InboxTemplate {
        summary: FeedSummary::from_feed(&feed.items),
        rows: feed
            .items
            .iter()
            .take(INBOX_PAGE_SIZE)
            .map(InboxRow::from)
            .collect(),
        unavailable: feed.unavailable.iter().map(|s| s.to_string()).collect(),
    })
}
