//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use crate::application::services::MessageService;
use crate::gateway::Gateway;

/// Long-lived components, built once in [`crate::server::run`].
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub message_service: Arc<MessageService>,
}

impl AppState {
    pub fn new(gateway: Arc<Gateway>, message_service: Arc<MessageService>) -> Self {
        Self {
            gateway,
            message_service,
        }
    }
}
