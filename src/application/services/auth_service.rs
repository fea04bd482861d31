//! Session/token resolution for every inbound request.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header::COOKIE, request::Parts};
use axum_auth::AuthBearer;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::credentials::CredentialVerifier;
use crate::domain::identity::IdentityClaim;

/// Cookie carrying the session token for browser requests.
pub const SESSION_COOKIE: &str = "auth-token";

/// Resolves the caller's identity from request headers.
///
/// Token lookup order:
///
/// 1. `Authorization: Bearer <token>`
/// 2. `Cookie: auth-token=<token>`
///
/// Verification is delegated to the [`CredentialVerifier`]; the resolver
/// trusts the signed claim and never queries the user store.
pub struct AuthService {
    verifier: Arc<dyn CredentialVerifier>,
}

impl AuthService {
    /// Creates a resolver backed by `verifier`.
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }

    /// Resolves the identity claim for a request.
    ///
    /// Missing, malformed, forged and expired tokens all resolve to
    /// [`IdentityClaim::anonymous`]. This never fails.
    pub async fn resolve(&self, parts: &mut Parts) -> IdentityClaim {
        self.resolve_at(parts, Utc::now()).await
    }

    /// Same as [`AuthService::resolve`] with an explicit clock value.
    pub async fn resolve_at(&self, parts: &mut Parts, now: DateTime<Utc>) -> IdentityClaim {
        let Some(token) = extract_token(parts).await else {
            return IdentityClaim::anonymous();
        };

        match self.verifier.verify(&token, now) {
            Ok(claim) => IdentityClaim::from(claim),
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                IdentityClaim::anonymous()
            }
        }
    }
}

async fn extract_token(parts: &mut Parts) -> Option<String> {
    if let Ok(AuthBearer(token)) = AuthBearer::from_request_parts(parts, &()).await
        && !token.is_empty()
    {
        return Some(token);
    }

    cookie_value(&parts.headers, SESSION_COOKIE).filter(|token| !token.is_empty())
}

/// Extracts a cookie value from the `Cookie` header.
///
/// Handles several cookies per header, split on semicolons.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|cookie_header| cookie_header.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name => Some(value.to_string()),
                _ => None,
            }
        })
}
