//! Handler for the public contact form.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::contact::{ContactRequest, ContactResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Stores a contact-form submission with status `NEW`.
///
/// # Endpoint
///
/// `POST /api/contact`
///
/// Charged against the `contact` rate-limit category by the gateway.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Ana",
///   "email": "ana@example.com",
///   "subject": "Presupuesto",
///   "message": "Hola"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails.
pub async fn contact_handler(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    payload.validate()?;

    let created = state
        .message_service
        .submit_contact_form(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}
