mod common;

use common::{InMemoryContactForms, InMemoryInternalMessages, contact_form, internal_message};
use portal_gateway::domain::entities::{ContactStatus, MessageStatus};
use portal_gateway::domain::identity::Role;
use std::sync::Arc;

#[tokio::test]
async fn test_login_page_keeps_redirect() {
    let server = common::empty_server();

    let response = server.get("/login?redirect=%2Fadmin%2Fmessages").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("login-form"));
    assert!(html.contains("admin"));
}

#[tokio::test]
async fn test_login_page_drops_offsite_redirect() {
    let server = common::empty_server();

    let response = server.get("/login?redirect=https%3A%2F%2Fevil.example").await;

    response.assert_status_ok();
    assert!(!response.text().contains("evil.example"));
}

#[tokio::test]
async fn test_portal_page_for_client() {
    let server = common::empty_server();

    let response = server
        .get("/portal")
        .add_header("authorization", common::bearer(Role::Client))
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("user@example.com"));
}

#[tokio::test]
async fn test_inbox_page_renders_feed() {
    let server = common::create_test_server(
        Arc::new(InMemoryInternalMessages::with(vec![internal_message(
            "m1",
            100,
            MessageStatus::Unread,
        )])),
        Arc::new(InMemoryContactForms::with(vec![contact_form(
            "c1",
            200,
            ContactStatus::Closed,
        )])),
    );

    let response = server
        .get("/admin/messages")
        .add_header("authorization", common::bearer(Role::Admin))
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("data-id=\"contact_c1\""));
    assert!(html.contains("ARCHIVED"));
    assert!(html.contains("Interno m1"));
}
