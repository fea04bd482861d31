//! PostgreSQL implementation of the contact-form repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ContactForm, ContactStatus, NewContactForm};
use crate::domain::repositories::ContactFormRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ContactFormRow {
    id: String,
    name: String,
    email: String,
    phone: Option<String>,
    company: Option<String>,
    subject: Option<String>,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
    replied_at: Option<DateTime<Utc>>,
}

impl TryFrom<ContactFormRow> for ContactForm {
    type Error = AppError;

    fn try_from(row: ContactFormRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<ContactStatus>().map_err(|e: String| {
            AppError::internal("Corrupt contact form row", json!({ "id": row.id, "reason": e }))
        })?;

        Ok(ContactForm {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            subject: row.subject,
            message: row.message,
            status,
            created_at: row.created_at,
            replied_at: row.replied_at,
        })
    }
}

/// PostgreSQL repository over the `contact_forms` table.
pub struct PgContactFormRepository {
    pool: Arc<PgPool>,
}

impl PgContactFormRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactFormRepository for PgContactFormRepository {
    async fn list_all(&self) -> Result<Vec<ContactForm>, AppError> {
        let rows = sqlx::query_as::<_, ContactFormRow>(
            r#"
            SELECT id, name, email, phone, company, subject, message,
                   status, created_at, replied_at
            FROM contact_forms
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(ContactForm::try_from).collect()
    }

    async fn create(&self, form: NewContactForm) -> Result<ContactForm, AppError> {
        let row = sqlx::query_as::<_, ContactFormRow>(
            r#"
            INSERT INTO contact_forms (name, email, phone, company, subject, message, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'NEW')
            RETURNING id, name, email, phone, company, subject, message,
                      status, created_at, replied_at
            "#,
        )
        .bind(form.name)
        .bind(form.email)
        .bind(form.phone)
        .bind(form.company)
        .bind(form.subject)
        .bind(form.message)
        .fetch_one(self.pool.as_ref())
        .await?;

        ContactForm::try_from(row)
    }

    async fn update_status(&self, id: &str, status: ContactStatus) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE contact_forms
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
