//! Caller identity as seen by the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried by a session claim.
///
/// Ordered from least to most privileged. Anything that cannot be decoded
/// into one of these variants is treated as [`Role::Anonymous`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Anonymous,
    Client,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "ANONYMOUS",
            Role::Client => "CLIENT",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ANONYMOUS" => Ok(Role::Anonymous),
            "CLIENT" => Ok(Role::Client),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Resolved identity for a single request.
///
/// Built fresh by [`crate::application::services::AuthService::resolve`] and
/// stored in the request extensions; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClaim {
    pub subject_id: Option<String>,
    pub role: Role,
    pub email: Option<String>,
}

impl IdentityClaim {
    pub fn anonymous() -> Self {
        Self {
            subject_id: None,
            role: Role::Anonymous,
            email: None,
        }
    }

    pub fn new(subject_id: impl Into<String>, role: Role, email: Option<String>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
            role,
            email,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.role == Role::Anonymous
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl Default for IdentityClaim {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Claim returned by the credential collaborator after signature and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaim {
    pub subject_id: String,
    pub role: Role,
    pub email: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<VerifiedClaim> for IdentityClaim {
    fn from(claim: VerifiedClaim) -> Self {
        Self {
            subject_id: Some(claim.subject_id),
            role: claim.role,
            email: claim.email,
        }
    }
}
