//! HMAC-SHA256 signed session tokens.
//!
//! # Token Format
//!
//! ```text
//! base64url(claims-json) "." base64url(HMAC-SHA256(secret, base64url(claims-json)))
//! ```
//!
//! Claims carry `sub`, `role`, `email`, `iat` and `exp` (Unix seconds).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::credentials::{CredentialError, CredentialVerifier};
use crate::domain::identity::{Role, VerifiedClaim};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens with a shared signing secret.
///
/// An attacker without the secret can neither forge a token nor change the
/// role inside one.
pub struct HmacCredentials {
    secret: Vec<u8>,
}

impl HmacCredentials {
    /// Creates a verifier keyed by `signing_secret` (`SESSION_SIGNING_SECRET`).
    pub fn new(signing_secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: signing_secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length")
    }

    /// Issues a token for `subject_id` valid from `now` for `ttl`.
    pub fn issue(
        &self,
        subject_id: &str,
        role: Role,
        email: Option<&str>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> String {
        let claims = TokenClaims {
            sub: subject_id.to_string(),
            role,
            email: email.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let json = serde_json::to_vec(&claims).expect("token claims serialize to JSON");
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", payload, signature)
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, CredentialError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(CredentialError::Malformed)
}

impl CredentialVerifier for HmacCredentials {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedClaim, CredentialError> {
        let (payload, signature) = token.split_once('.').ok_or(CredentialError::Malformed)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| CredentialError::Malformed)?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| CredentialError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| CredentialError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&json).map_err(|_| CredentialError::Malformed)?;

        let issued_at = timestamp(claims.iat)?;
        let expires_at = timestamp(claims.exp)?;

        if now >= expires_at {
            return Err(CredentialError::Expired(expires_at));
        }

        Ok(VerifiedClaim {
            subject_id: claims.sub,
            role: claims.role,
            email: claims.email,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> HmacCredentials {
        HmacCredentials::new("test-session-secret")
    }

    #[test]
    fn test_issue_and_verify() {
        let creds = credentials();
        let now = Utc::now();
        let token = creds.issue("user-1", Role::Client, Some("a@b.com"), Duration::hours(1), now);

        let claim = creds.verify(&token, now).unwrap();

        assert_eq!(claim.subject_id, "user-1");
        assert_eq!(claim.role, Role::Client);
        assert_eq!(claim.email.as_deref(), Some("a@b.com"));
        assert_eq!(claim.expires_at.timestamp(), (now + Duration::hours(1)).timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let creds = credentials();
        let now = Utc::now();
        let token = creds.issue("user-1", Role::Admin, None, Duration::minutes(5), now);

        let result = creds.verify(&token, now + Duration::minutes(6));

        assert!(matches!(result, Err(CredentialError::Expired(_))));
    }

    #[test]
    fn test_other_secret_rejected() {
        let now = Utc::now();
        let token = credentials().issue("user-1", Role::Admin, None, Duration::hours(1), now);

        let result = HmacCredentials::new("another-secret").verify(&token, now);

        assert_eq!(result, Err(CredentialError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let creds = credentials();
        let now = Utc::now();
        let client = creds.issue("user-1", Role::Client, None, Duration::hours(1), now);
        let admin = creds.issue("user-1", Role::Admin, None, Duration::hours(1), now);

        let (client_payload, _) = client.split_once('.').unwrap();
        let (_, admin_signature) = admin.split_once('.').unwrap();
        let forged = format!("{}.{}", client_payload, admin_signature);

        assert_eq!(creds.verify(&forged, now), Err(CredentialError::BadSignature));
    }

    #[test]
    fn test_garbage_rejected() {
        let creds = credentials();
        let now = Utc::now();

        assert_eq!(creds.verify("", now), Err(CredentialError::Malformed));
        assert_eq!(creds.verify("no-dot", now), Err(CredentialError::Malformed));
        assert_eq!(creds.verify("a.!!!", now), Err(CredentialError::Malformed));
    }

    #[test]
    fn test_unknown_role_is_malformed() {
        let creds = credentials();
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({ "sub": "u", "role": "ROOT", "iat": 0, "exp": 4_102_444_800i64 })
                .to_string(),
        );
        let mut mac = creds.mac();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let result = creds.verify(&format!("{}.{}", payload, signature), Utc::now());

        assert_eq!(result, Err(CredentialError::Malformed));
    }
}
