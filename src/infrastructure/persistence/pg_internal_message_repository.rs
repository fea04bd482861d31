//! PostgreSQL implementation of the internal message repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{InternalMessage, MessageStatus, Priority};
use crate::domain::repositories::InternalMessageRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct InternalMessageRow {
    id: String,
    sender_name: String,
    sender_email: String,
    subject: String,
    content: String,
    status: String,
    priority: String,
    created_at: DateTime<Utc>,
    replied_at: Option<DateTime<Utc>>,
}

impl TryFrom<InternalMessageRow> for InternalMessage {
    type Error = AppError;

    fn try_from(row: InternalMessageRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<MessageStatus>().map_err(|e: String| {
            AppError::internal("Corrupt message row", json!({ "id": row.id, "reason": e }))
        })?;
        let priority = row.priority.parse::<Priority>().map_err(|e: String| {
            AppError::internal("Corrupt message row", json!({ "id": row.id, "reason": e }))
        })?;

        Ok(InternalMessage {
            id: row.id,
            sender_name: row.sender_name,
            sender_email: row.sender_email,
            subject: row.subject,
            content: row.content,
            status,
            priority,
            created_at: row.created_at,
            replied_at: row.replied_at,
        })
    }
}

/// PostgreSQL repository over the `internal_messages` table.
pub struct PgInternalMessageRepository {
    pool: Arc<PgPool>,
}

impl PgInternalMessageRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InternalMessageRepository for PgInternalMessageRepository {
    async fn list_all(&self) -> Result<Vec<InternalMessage>, AppError> {
        let rows = sqlx::query_as::<_, InternalMessageRow>(
            r#"
            SELECT id, sender_name, sender_email, subject, content,
                   status, priority, created_at, replied_at
            FROM internal_messages
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(InternalMessage::try_from).collect()
    }

    async fn update_status(&self, id: &str, status: MessageStatus) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE internal_messages
            SET status = $2,
                replied_at = CASE
                    WHEN $2 = 'REPLIED' THEN COALESCE(replied_at, NOW())
                    ELSE replied_at
                END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
