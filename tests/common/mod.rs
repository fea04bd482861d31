#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use portal_gateway::application::services::{AuthService, MessageService};
use portal_gateway::domain::entities::{
    ContactForm, ContactStatus, InternalMessage, MessageStatus, NewContactForm, Priority,
};
use portal_gateway::domain::identity::Role;
use portal_gateway::domain::repositories::{ContactFormRepository, InternalMessageRepository};
use portal_gateway::error::AppError;
use portal_gateway::gateway::{AccessPolicy, Gateway, RateLimitRules, RateLimiter, SecurityHeaders};
use portal_gateway::infrastructure::credentials::HmacCredentials;
use portal_gateway::routes;
use portal_gateway::state::AppState;
use serde_json::json;
use std::sync::{Arc, Mutex};

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const CORS_ORIGIN: &str = "https://portal.example.com";

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn internal_message(id: &str, secs: i64, status: MessageStatus) -> InternalMessage {
    InternalMessage {
        id: id.to_string(),
        sender_name: "Equipo".to_string(),
        sender_email: "equipo@example.com".to_string(),
        subject: format!("Interno {}", id),
        content: "Contenido".to_string(),
        status,
        priority: Priority::High,
        created_at: at(secs),
        replied_at: None,
    }
}

pub fn contact_form(id: &str, secs: i64, status: ContactStatus) -> ContactForm {
    ContactForm {
        id: id.to_string(),
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        phone: None,
        company: None,
        subject: None,
        message: "Hola".to_string(),
        status,
        created_at: at(secs),
        replied_at: None,
    }
}

/// In-memory internal message store.
#[derive(Default)]
pub struct InMemoryInternalMessages {
    pub rows: Mutex<Vec<InternalMessage>>,
    pub failing: bool,
}

impl InMemoryInternalMessages {
    pub fn with(rows: Vec<InternalMessage>) -> Self {
        Self {
            rows: Mutex::new(rows),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            failing: true,
        }
    }
}

#[async_trait]
impl InternalMessageRepository for InMemoryInternalMessages {
    async fn list_all(&self) -> Result<Vec<InternalMessage>, AppError> {
        if self.failing {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn update_status(&self, id: &str, status: MessageStatus) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|m| m.id == id) {
            Some(row) => {
                row.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory contact form store.
#[derive(Default)]
pub struct InMemoryContactForms {
    pub rows: Mutex<Vec<ContactForm>>,
    pub failing: bool,
}

impl InMemoryContactForms {
    pub fn with(rows: Vec<ContactForm>) -> Self {
        Self {
            rows: Mutex::new(rows),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn status_of(&self, id: &str) -> Option<ContactStatus> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.status)
    }
}

#[async_trait]
impl ContactFormRepository for InMemoryContactForms {
    async fn list_all(&self) -> Result<Vec<ContactForm>, AppError> {
        if self.failing {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn create(&self, form: NewContactForm) -> Result<ContactForm, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let created = ContactForm {
            id: format!("cf-{}", rows.len() + 1),
            name: form.name,
            email: form.email,
            phone: form.phone,
            company: form.company,
            subject: form.subject,
            message: form.message,
            status: ContactStatus::New,
            created_at: Utc::now(),
            replied_at: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update_status(&self, id: &str, status: ContactStatus) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                row.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub fn create_test_state(
    internal: Arc<InMemoryInternalMessages>,
    contact: Arc<InMemoryContactForms>,
    rules: RateLimitRules,
) -> AppState {
    let verifier = Arc::new(HmacCredentials::new(SIGNING_SECRET));
    let gateway = Arc::new(Gateway::new(
        Arc::new(AuthService::new(verifier)),
        AccessPolicy::default(),
        Arc::new(RateLimiter::new(rules)),
        SecurityHeaders::new(CORS_ORIGIN).unwrap(),
        false,
    ));
    let message_service = Arc::new(MessageService::new(internal, contact));

    AppState::new(gateway, message_service)
}

pub fn create_test_server(
    internal: Arc<InMemoryInternalMessages>,
    contact: Arc<InMemoryContactForms>,
) -> TestServer {
    create_test_server_with_rules(internal, contact, RateLimitRules::default())
}

pub fn create_test_server_with_rules(
    internal: Arc<InMemoryInternalMessages>,
    contact: Arc<InMemoryContactForms>,
    rules: RateLimitRules,
) -> TestServer {
    let state = create_test_state(internal, contact, rules);
    TestServer::new(routes::router(state)).unwrap()
}

pub fn empty_server() -> TestServer {
    create_test_server(
        Arc::new(InMemoryInternalMessages::default()),
        Arc::new(InMemoryContactForms::default()),
    )
}

pub fn token(role: Role) -> String {
    HmacCredentials::new(SIGNING_SECRET).issue(
        &format!("{}-1", role.as_str().to_lowercase()),
        role,
        Some("user@example.com"),
        Duration::hours(1),
        Utc::now(),
    )
}

pub fn bearer(role: Role) -> String {
    format!("Bearer {}", token(role))
}
