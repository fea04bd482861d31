//! Port to the credential issuance/validation collaborator.

use crate::domain::identity::VerifiedClaim;
use chrono::{DateTime, Utc};

/// Reasons a session token was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token expired at {0}")]
    Expired(DateTime<Utc>),
}

/// Verifies a raw session token and returns the claim embedded in it.
///
/// Implementations check signature and expiry only; they never consult the
/// store of record, so role changes become visible on the next token refresh.
///
/// # Implementations
///
/// - [`crate::infrastructure::credentials::HmacCredentials`] - HMAC-SHA256 signed tokens
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait CredentialVerifier: Send + Sync {
    /// Verifies `token` against the clock value `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the token is malformed, forged or expired.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedClaim, CredentialError>;
}
