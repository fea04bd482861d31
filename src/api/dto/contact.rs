//! DTOs for the public contact form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{ContactForm, ContactStatus, NewContactForm};

/// Contact form submission.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    #[validate(length(max = 100))]
    pub company: Option<String>,

    #[validate(length(max = 200))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

/// Blank optional fields are stored as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<ContactRequest> for NewContactForm {
    fn from(req: ContactRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            phone: non_blank(req.phone),
            company: non_blank(req.company),
            subject: non_blank(req.subject),
            message: req.message,
        }
    }
}

/// Stored submission acknowledgement.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ContactForm> for ContactResponse {
    fn from(form: ContactForm) -> Self {
        Self {
            id: form.id,
            status: form.status,
            created_at: form.created_at,
        }
    }
}
