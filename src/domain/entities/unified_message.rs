//! Unified operator feed built from the internal and contact-form stores.
//!
//! Origin rows are wrapped in [`OriginRecord`] before normalization, so the
//! projection dispatches on the variant rather than on id prefixes. The
//! namespaced id ([`MessageId`]) is only produced at the edge, for clients and
//! for routing write-backs to the right store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::contact_form::{ContactForm, ContactStatus};
use super::internal_message::{InternalMessage, MessageStatus, Priority};

/// Id prefix marking records that originate from the contact-form store.
pub const CONTACT_ID_PREFIX: &str = "contact_";

/// Subject shown for contact forms submitted without one.
pub const DEFAULT_CONTACT_SUBJECT: &str = "Formulario de contacto";

/// Store a unified record was read from.
///
/// Variant order is the tie-break order of the feed: internal messages sort
/// before contact forms when timestamps are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageSource {
    Internal,
    ContactForm,
}

impl MessageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSource::Internal => "INTERNAL",
            MessageSource::ContactForm => "CONTACT_FORM",
        }
    }
}

impl fmt::Display for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INTERNAL" => Ok(MessageSource::Internal),
            "CONTACT_FORM" | "CONTACT" => Ok(MessageSource::ContactForm),
            other => Err(format!("unknown message source '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageIdError {
    #[error("message id is empty")]
    Empty,
}

/// Namespaced identifier of a unified record.
///
/// Contact forms render as `contact_<rawId>`, internal messages as the raw id.
/// Internal ids are assumed never to start with [`CONTACT_ID_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    Internal(String),
    ContactForm(String),
}

impl MessageId {
    /// Parses a namespaced id, stripping the source prefix.
    ///
    /// # Errors
    ///
    /// Returns [`MessageIdError::Empty`] when the id, or the part after the
    /// prefix, is empty.
    pub fn parse(id: &str) -> Result<Self, MessageIdError> {
        let id = id.trim();
        let parsed = match id.strip_prefix(CONTACT_ID_PREFIX) {
            Some(raw) => MessageId::ContactForm(raw.to_string()),
            None => MessageId::Internal(id.to_string()),
        };

        if parsed.raw().is_empty() {
            return Err(MessageIdError::Empty);
        }
        Ok(parsed)
    }

    pub fn source(&self) -> MessageSource {
        match self {
            MessageId::Internal(_) => MessageSource::Internal,
            MessageId::ContactForm(_) => MessageSource::ContactForm,
        }
    }

    /// Id as known by the origin store.
    pub fn raw(&self) -> &str {
        match self {
            MessageId::Internal(raw) | MessageId::ContactForm(raw) => raw,
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Internal(raw) => f.write_str(raw),
            MessageId::ContactForm(raw) => write!(f, "{}{}", CONTACT_ID_PREFIX, raw),
        }
    }
}

/// Maps the contact-form vocabulary onto the unified one.
///
/// | contact form  | unified  |
/// |---------------|----------|
/// | `NEW`         | `UNREAD` |
/// | `IN_PROGRESS` | `READ`   |
/// | `REPLIED`     | `REPLIED`|
/// | `CLOSED`      | `ARCHIVED` |
///
/// `CLOSED` folds into `ARCHIVED`: the feed cannot tell a closed enquiry from
/// an archived one, and writing `ARCHIVED` back always stores `CLOSED`.
pub fn contact_status_to_unified(status: ContactStatus) -> MessageStatus {
    match status {
        ContactStatus::New => MessageStatus::Unread,
        ContactStatus::InProgress => MessageStatus::Read,
        ContactStatus::Replied => MessageStatus::Replied,
        ContactStatus::Closed => MessageStatus::Archived,
    }
}

/// Inverse of [`contact_status_to_unified`], used for write-backs.
pub fn unified_status_to_contact(status: MessageStatus) -> ContactStatus {
    match status {
        MessageStatus::Unread => ContactStatus::New,
        MessageStatus::Read => ContactStatus::InProgress,
        MessageStatus::Replied => ContactStatus::Replied,
        MessageStatus::Archived => ContactStatus::Closed,
    }
}

/// A row from either origin store, prior to normalization.
#[derive(Debug, Clone)]
pub enum OriginRecord {
    Internal(InternalMessage),
    ContactForm(ContactForm),
}

impl OriginRecord {
    /// Projects the origin row onto the unified shape.
    pub fn normalize(self) -> UnifiedMessage {
        match self {
            OriginRecord::Internal(m) => UnifiedMessage {
                id: MessageId::Internal(m.id).to_string(),
                source: MessageSource::Internal,
                sender_name: m.sender_name,
                sender_email: m.sender_email,
                subject: m.subject,
                content: m.content,
                status: m.status,
                priority: m.priority,
                created_at: m.created_at,
                replied_at: m.replied_at,
            },
            OriginRecord::ContactForm(c) => UnifiedMessage {
                id: MessageId::ContactForm(c.id).to_string(),
                source: MessageSource::ContactForm,
                sender_name: c.name,
                sender_email: c.email,
                subject: c
                    .subject
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CONTACT_SUBJECT.to_string()),
                content: c.message,
                status: contact_status_to_unified(c.status),
                priority: Priority::Medium,
                created_at: c.created_at,
                replied_at: c.replied_at,
            },
        }
    }
}

/// A record of the operator feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedMessage {
    pub id: String,
    pub source: MessageSource,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub content: String,
    pub status: MessageStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub replied_at: Option<DateTime<Utc>>,
}

/// Feed order: newest first, then internal before contact form, then id.
fn feed_order(a: &UnifiedMessage, b: &UnifiedMessage) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.id.cmp(&b.id))
}

/// Normalizes and merges two store snapshots into the ordered feed.
///
/// The result depends only on the two input sets, not on the order the
/// stores returned rows in.
pub fn merge_feed(internal: Vec<InternalMessage>, contact: Vec<ContactForm>) -> Vec<UnifiedMessage> {
    let mut feed: Vec<UnifiedMessage> = internal
        .into_iter()
        .map(OriginRecord::Internal)
        .chain(contact.into_iter().map(OriginRecord::ContactForm))
        .map(OriginRecord::normalize)
        .collect();

    feed.sort_by(feed_order);
    feed
}

/// Counters shown next to the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    pub total: usize,
    pub unread: usize,
    pub urgent: usize,
    pub internal: usize,
    pub contact_form: usize,
}

impl FeedSummary {
    pub fn from_feed(feed: &[UnifiedMessage]) -> Self {
        feed.iter().fold(Self::default(), |mut acc, m| {
            acc.total += 1;
            if m.status == MessageStatus::Unread {
                acc.unread += 1;
            }
            if m.priority == Priority::Urgent {
                acc.urgent += 1;
            }
            match m.source {
                MessageSource::Internal => acc.internal += 1,
                MessageSource::ContactForm => acc.contact_form += 1,
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn internal(id: &str, secs: i64) -> InternalMessage {
        InternalMessage {
            id: id.to_string(),
            sender_name: "Ana".to_string(),
            sender_email: "ana@example.com".to_string(),
            subject: "Factura".to_string(),
            content: "Hola".to_string(),
            status: MessageStatus::Unread,
            priority: Priority::High,
            created_at: at(secs),
            replied_at: None,
        }
    }

    fn contact(id: &str, secs: i64, status: ContactStatus) -> ContactForm {
        ContactForm {
            id: id.to_string(),
            name: "Luis".to_string(),
            email: "luis@example.com".to_string(),
            phone: None,
            company: None,
            subject: None,
            message: "Quiero un presupuesto".to_string(),
            status,
            created_at: at(secs),
            replied_at: None,
        }
    }

    #[test]
    fn test_message_id_parse() {
        assert_eq!(
            MessageId::parse("contact_42").unwrap(),
            MessageId::ContactForm("42".to_string())
        );
        assert_eq!(
            MessageId::parse("abc").unwrap(),
            MessageId::Internal("abc".to_string())
        );
        assert_eq!(MessageId::parse("contact_"), Err(MessageIdError::Empty));
        assert_eq!(MessageId::parse("  "), Err(MessageIdError::Empty));
    }

    #[test]
    fn test_message_id_display_restores_namespace() {
        assert_eq!(MessageId::ContactForm("7".to_string()).to_string(), "contact_7");
        assert_eq!(MessageId::Internal("7".to_string()).to_string(), "7");
        assert_eq!(
            MessageId::parse("contact_7").unwrap().source(),
            MessageSource::ContactForm
        );
    }

    #[test]
    fn test_contact_status_table() {
        assert_eq!(contact_status_to_unified(ContactStatus::New), MessageStatus::Unread);
        assert_eq!(
            contact_status_to_unified(ContactStatus::InProgress),
            MessageStatus::Read
        );
        assert_eq!(
            contact_status_to_unified(ContactStatus::Replied),
            MessageStatus::Replied
        );
        assert_eq!(
            contact_status_to_unified(ContactStatus::Closed),
            MessageStatus::Archived
        );
        assert_eq!(
            unified_status_to_contact(MessageStatus::Archived),
            ContactStatus::Closed
        );
    }

    #[test]
    fn test_closed_contact_form_appears_archived() {
        let feed = merge_feed(vec![], vec![contact("9", 10, ContactStatus::Closed)]);

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].status, MessageStatus::Archived);
        assert_eq!(feed[0].id, "contact_9");
        assert_eq!(feed[0].source, MessageSource::ContactForm);
        assert_eq!(feed[0].subject, DEFAULT_CONTACT_SUBJECT);
        assert_eq!(feed[0].priority, Priority::Medium);
    }

    #[test]
    fn test_equal_timestamps_put_internal_first() {
        let feed = merge_feed(
            vec![internal("m1", 10)],
            vec![contact("c1", 10, ContactStatus::New)],
        );

        assert_eq!(feed[0].source, MessageSource::Internal);
        assert_eq!(feed[1].source, MessageSource::ContactForm);
    }

    #[test]
    fn test_feed_is_newest_first() {
        let feed = merge_feed(
            vec![internal("m1", 5), internal("m2", 30)],
            vec![contact("c1", 20, ContactStatus::New)],
        );

        let ids: Vec<&str> = feed.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "contact_c1", "m1"]);
    }

    #[test]
    fn test_feed_ignores_input_order() {
        let a = merge_feed(
            vec![internal("b", 10), internal("a", 10)],
            vec![contact("2", 10, ContactStatus::New), contact("1", 10, ContactStatus::New)],
        );
        let b = merge_feed(
            vec![internal("a", 10), internal("b", 10)],
            vec![contact("1", 10, ContactStatus::New), contact("2", 10, ContactStatus::New)],
        );

        assert_eq!(a, b);
    }

    #[test]
    fn test_summary_counts() {
        let mut urgent = internal("u", 1);
        urgent.priority = Priority::Urgent;
        urgent.status = MessageStatus::Read;

        let feed = merge_feed(
            vec![internal("m1", 2), urgent],
            vec![contact("c1", 3, ContactStatus::Closed)],
        );
        let summary = FeedSummary::from_feed(&feed);

        assert_eq!(
            summary,
            FeedSummary {
                total: 3,
                unread: 1,
                urgent: 1,
                internal: 2,
                contact_form: 1,
            }
        );
    }
}
