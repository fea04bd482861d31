//! Domain entity for public contact-form submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status used by the contact-form store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    New,
    InProgress,
    Replied,
    Closed,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "NEW",
            ContactStatus::InProgress => "IN_PROGRESS",
            ContactStatus::Replied => "REPLIED",
            ContactStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(ContactStatus::New),
            "IN_PROGRESS" => Ok(ContactStatus::InProgress),
            "REPLIED" => Ok(ContactStatus::Replied),
            "CLOSED" => Ok(ContactStatus::Closed),
            other => Err(format!("unknown contact status '{}'", other)),
        }
    }
}

/// A stored contact-form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactForm {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub replied_at: Option<DateTime<Utc>>,
}

/// Input data for storing a new submission. New rows start as [`ContactStatus::New`].
#[derive(Debug, Clone)]
pub struct NewContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}
