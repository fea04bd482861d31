use axum::http::Uri;
use serde_json::json;

use crate::error::AppError;

/// JSON 404 for anything no route matched. Runs after the gateway, so
/// unknown admin paths still answer 401/403 first.
pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::not_found("Not found", json!({ "path": uri.path() }))
}
