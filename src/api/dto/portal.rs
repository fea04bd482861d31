//! DTOs for the client portal.

use serde::Serialize;

use crate::domain::identity::{IdentityClaim, Role};

/// The caller as the gateway resolved it.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject_id: Option<String>,
    pub role: Role,
    pub email: Option<String>,
}

impl From<IdentityClaim> for MeResponse {
    fn from(claim: IdentityClaim) -> Self {
        Self {
            subject_id: claim.subject_id,
            role: claim.role,
            email: claim.email,
        }
    }
}
