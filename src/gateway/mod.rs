//! Request gateway in front of every route.
//!
//! # Request Flow
//!
//! 1. Resolve the identity claim ([`AuthService`])
//! 2. Authorize the path ([`AccessPolicy`]); deny, redirect or continue
//! 3. Charge the client's bucket for the path's [`RateCategory`]; 429 if full
//! 4. Attach security headers, plus CORS on API paths
//! 5. Forward to the handler with the claim in the request extensions
//!
//! Denied requests stop at step 2 and are not charged. Admitted requests are
//! charged whether or not the handler succeeds. CORS preflights on API paths
//! are answered before step 1 and charged to [`RateCategory::General`], so a
//! preflight never uses up a contact or auth slot.
//!
//! # Modules
//!
//! - [`rate_limiter`] - Fixed-window buckets
//! - [`policy`] - Route classification and decisions
//! - [`headers`] - Security and CORS headers
//! - [`client_key`] - Bucket key derivation

pub mod client_key;
pub mod headers;
pub mod policy;
pub mod rate_limiter;

pub use client_key::client_key;
pub use headers::SecurityHeaders;
pub use policy::{AccessPolicy, Decision, RouteClass};
pub use rate_limiter::{RateCategory, RateLimitExceeded, RateLimitRule, RateLimitRules, RateLimiter};

use axum::extract::Request;
use axum::http::{Method, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;
use std::sync::Arc;

use crate::application::services::AuthService;
use crate::domain::identity::IdentityClaim;
use crate::error::AppError;

pub const UNAUTHORIZED_MESSAGE: &str = "No autorizado";
pub const FORBIDDEN_MESSAGE: &str = "Acceso denegado. Se requieren permisos de administrador";

/// Composition root of the gateway.
pub struct Gateway {
    auth: Arc<AuthService>,
    policy: AccessPolicy,
    limiter: Arc<RateLimiter>,
    headers: SecurityHeaders,
    behind_proxy: bool,
}

impl Gateway {
    /// # Arguments
    ///
    /// - `behind_proxy` - take the client IP from `X-Forwarded-For` / `X-Real-IP`;
    ///   enable only behind a trusted reverse proxy
    pub fn new(
        auth: Arc<AuthService>,
        policy: AccessPolicy,
        limiter: Arc<RateLimiter>,
        headers: SecurityHeaders,
        behind_proxy: bool,
    ) -> Self {
        Self {
            auth,
            policy,
            limiter,
            headers,
            behind_proxy,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Runs steps 1-3 on the request head.
    ///
    /// Returns the identity claim when the request may proceed, or the
    /// short-circuit response (without security headers) when it may not.
    pub async fn admit(&self, parts: &mut Parts) -> Result<IdentityClaim, Response> {
        let path = parts.uri.path().to_string();

        let identity = self.auth.resolve(parts).await;

        let decision = self.policy.authorize(&identity, &path);
        let label = decision.label();
        if let Some(response) = denial_response(decision) {
            tracing::info!(
                path = %path,
                role = %identity.role,
                decision = label,
                "Request denied"
            );
            metrics::counter!("gateway_requests_total", "decision" => label).increment(1);
            return Err(response);
        }

        self.charge(parts, RateCategory::for_path(&path))?;

        tracing::debug!(path = %path, role = %identity.role, "Request admitted");
        metrics::counter!("gateway_requests_total", "decision" => "allow").increment(1);
        Ok(identity)
    }

    /// Charges one hit to the caller's `category` bucket; the 429 response
    /// when it is full.
    fn charge(&self, parts: &Parts, category: RateCategory) -> Result<(), Response> {
        let key = client_key::client_key_for(parts, self.behind_proxy);

        self.limiter.consume(&key, category).map_err(|exceeded| {
            tracing::warn!(
                path = %parts.uri.path(),
                client = %key,
                category = %category,
                retry_after = exceeded.retry_after_seconds,
                "Rate limit exceeded"
            );
            metrics::counter!("gateway_rate_limited_total", "category" => category.as_str())
                .increment(1);
            AppError::rate_limited(exceeded.retry_after_seconds).into_response()
        })
    }

    /// Handles one request end to end.
    pub async fn handle(&self, req: Request, next: Next) -> Response {
        let is_api = self.policy.is_api(req.uri().path());
        let (mut parts, body) = req.into_parts();

        if is_api && parts.method == Method::OPTIONS {
            return match self.charge(&parts, RateCategory::General) {
                Ok(()) => self.headers.preflight_response(),
                Err(mut response) => {
                    self.headers.apply(response.headers_mut(), true);
                    response
                }
            };
        }

        let mut response = match self.admit(&mut parts).await {
            Ok(identity) => {
                parts.extensions.insert(identity);
                next.run(Request::from_parts(parts, body)).await
            }
            Err(response) => response,
        };

        self.headers.apply(response.headers_mut(), is_api);
        response
    }
}

/// Response for a non-allow decision; `None` for [`Decision::Allow`].
fn denial_response(decision: Decision) -> Option<Response> {
    let response = match decision {
        Decision::Allow => return None,
        Decision::Unauthenticated => {
            AppError::unauthorized(UNAUTHORIZED_MESSAGE, json!({})).into_response()
        }
        Decision::Forbidden => AppError::forbidden(FORBIDDEN_MESSAGE, json!({})).into_response(),
        Decision::Redirect(target) => Redirect::to(&target).into_response(),
    };
    Some(response)
}
