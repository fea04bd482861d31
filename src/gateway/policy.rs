//! Route classification and the authorization decision.
//!
//! [`AccessPolicy::authorize`] is a pure function of the identity claim and
//! the path. API vs page is decided by the `/api` prefix only, never by
//! request headers.

use crate::domain::identity::IdentityClaim;

/// Access class of a path. Every path has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Protected,
    AdminOnly,
}

/// Outcome of [`AccessPolicy::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// 401: protected API path without a valid identity.
    Unauthenticated,
    /// 403: admin API path with a non-admin identity.
    Forbidden,
    /// Page path the caller may not see; send the browser to `target`.
    Redirect(String),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Unauthenticated => "unauthenticated",
            Decision::Forbidden => "forbidden",
            Decision::Redirect(_) => "redirect",
        }
    }
}

/// Static route table.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    api_prefix: String,
    login_path: String,
    admin_prefixes: Vec<String>,
    protected_prefixes: Vec<String>,
}

impl Default for AccessPolicy {
    /// - admin-only: `/admin`, `/api/admin`
    /// - protected: `/portal`, `/api/portal`
    /// - public: everything else
    fn default() -> Self {
        Self::new(
            vec!["/admin".to_string(), "/api/admin".to_string()],
            vec!["/portal".to_string(), "/api/portal".to_string()],
        )
    }
}

impl AccessPolicy {
    pub fn new(admin_prefixes: Vec<String>, protected_prefixes: Vec<String>) -> Self {
        Self {
            api_prefix: "/api".to_string(),
            login_path: "/login".to_string(),
            admin_prefixes,
            protected_prefixes,
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Classifies a path. Admin prefixes are checked first, so a path under
    /// both an admin and a protected prefix is admin-only.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.admin_prefixes.iter().any(|p| under_prefix(path, p)) {
            RouteClass::AdminOnly
        } else if self.protected_prefixes.iter().any(|p| under_prefix(path, p)) {
            RouteClass::Protected
        } else {
            RouteClass::Public
        }
    }

    pub fn is_api(&self, path: &str) -> bool {
        under_prefix(path, &self.api_prefix)
    }

    /// Decides whether `identity` may reach `path`.
    ///
    /// | class     | anonymous        | client           | admin |
    /// |-----------|------------------|------------------|-------|
    /// | public    | allow            | allow            | allow |
    /// | protected | 401 / redirect   | allow            | allow |
    /// | admin     | 401 / redirect   | 403 / redirect   | allow |
    pub fn authorize(&self, identity: &IdentityClaim, path: &str) -> Decision {
        match self.classify(path) {
            RouteClass::Public => Decision::Allow,
            _ if identity.is_anonymous() => self.deny(path, Decision::Unauthenticated),
            RouteClass::Protected => Decision::Allow,
            RouteClass::AdminOnly if identity.is_admin() => Decision::Allow,
            RouteClass::AdminOnly => self.deny(path, Decision::Forbidden),
        }
    }

    fn deny(&self, path: &str, api_decision: Decision) -> Decision {
        if self.is_api(path) {
            api_decision
        } else {
            Decision::Redirect(self.login_redirect(path))
        }
    }

    /// Login URL that brings the user back to `path` afterwards.
    pub fn login_redirect(&self, path: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
        format!("{}?redirect={}", self.login_path, encoded)
    }
}

/// Segment-aware prefix match: `/admin` matches `/admin` and `/admin/x`,
/// not `/administrator`.
fn under_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
