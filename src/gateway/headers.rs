//! Security and CORS response headers.

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, REFERRER_POLICY, VARY,
    X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header::InvalidHeaderValue};
use axum::response::Response;

const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");

/// Fixed header set attached by the gateway.
///
/// Every response gets:
///
/// ```text
/// X-Content-Type-Options: nosniff
/// X-Frame-Options: DENY
/// X-XSS-Protection: 1; mode=block
/// Referrer-Policy: strict-origin-when-cross-origin
/// Permissions-Policy: camera=(), microphone=(), geolocation=()
/// ```
///
/// API responses additionally get CORS headers scoped to the configured origin.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    cors_origin: HeaderValue,
}

impl SecurityHeaders {
    /// # Errors
    ///
    /// Returns an error if `cors_origin` is not a valid header value.
    pub fn new(cors_origin: &str) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            cors_origin: HeaderValue::from_str(cors_origin)?,
        })
    }

    pub fn apply(&self, headers: &mut HeaderMap, is_api: bool) {
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
        headers.insert(
            REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        );
        headers.insert(
            PERMISSIONS_POLICY,
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        );

        if is_api {
            self.apply_cors(headers);
        }
    }

    fn apply_cors(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.cors_origin.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, PATCH, DELETE, OPTIONS"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }

    /// `204 No Content` answer to a CORS preflight on an API path.
    pub fn preflight_response(&self) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;

        let headers = response.headers_mut();
        self.apply(headers, true);
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));

        response
    }
}
