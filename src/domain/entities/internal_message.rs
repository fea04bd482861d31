//! Domain entity for messages stored in the internal messaging store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an internal message.
///
/// Shares its vocabulary with the unified feed, so no translation is needed
/// when projecting internal messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    Unread,
    Read,
    Replied,
    Archived,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Unread => "UNREAD",
            MessageStatus::Read => "READ",
            MessageStatus::Replied => "REPLIED",
            MessageStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNREAD" => Ok(MessageStatus::Unread),
            "READ" => Ok(MessageStatus::Read),
            "REPLIED" => Ok(MessageStatus::Replied),
            "ARCHIVED" => Ok(MessageStatus::Archived),
            other => Err(format!("unknown message status '{}'", other)),
        }
    }
}

/// Urgency assigned to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            "URGENT" => Ok(Priority::Urgent),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

/// A message row from the internal messaging store.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalMessage {
    pub id: String,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub content: String,
    pub status: MessageStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub replied_at: Option<DateTime<Utc>>,
}
