//! Client key derivation for rate-limit buckets.
//!
//! The key is `<ip>:<first 50 characters of the User-Agent>`. Two clients
//! behind the same NAT with different browsers get separate buckets; two
//! identical browsers behind the same NAT share one. The key is a bucketing
//! heuristic and must not be used as an identity.

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, header::USER_AGENT, request::Parts};
use std::net::SocketAddr;

/// Number of User-Agent characters that take part in the key.
pub const USER_AGENT_PREFIX_LEN: usize = 50;

const UNKNOWN: &str = "unknown";

/// Builds the bucket key from an IP and a User-Agent.
pub fn client_key(ip: Option<&str>, user_agent: Option<&str>) -> String {
    let ip = ip.filter(|ip| !ip.is_empty()).unwrap_or(UNKNOWN);
    let ua: String = user_agent
        .filter(|ua| !ua.is_empty())
        .unwrap_or(UNKNOWN)
        .chars()
        .take(USER_AGENT_PREFIX_LEN)
        .collect();

    format!("{}:{}", ip, ua)
}

/// Resolves the caller IP.
///
/// With `behind_proxy`, the first `X-Forwarded-For` entry wins, then
/// `X-Real-IP`. Otherwise (or when those are absent) the socket peer address
/// is used.
pub fn client_ip(parts: &Parts, behind_proxy: bool) -> Option<String> {
    if behind_proxy && let Some(ip) = forwarded_ip(&parts.headers) {
        return Some(ip);
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let from_header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    from_header("x-forwarded-for").or_else(|| from_header("x-real-ip"))
}

/// Key for the request described by `parts`.
pub fn client_key_for(parts: &Parts, behind_proxy: bool) -> String {
    let ip = client_ip(parts, behind_proxy);
    let ua = parts.headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

    client_key(ip.as_deref(), ua)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)], peer: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut parts = builder.body(()).unwrap().into_parts().0;
        if let Some(peer) = peer {
            parts
                .extensions
                .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        }
        parts
    }

    #[test]
    fn test_key_truncates_user_agent() {
        let ua = "a".repeat(80);
        let key = client_key(Some("10.0.0.1"), Some(&ua));

        assert_eq!(key, format!("10.0.0.1:{}", "a".repeat(50)));
    }

    #[test]
    fn test_key_defaults() {
        assert_eq!(client_key(None, None), "unknown:unknown");
        assert_eq!(client_key(Some(""), Some("curl/8")), "unknown:curl/8");
    }

    #[test]
    fn test_same_ip_different_agents_differ() {
        let a = client_key(Some("10.0.0.1"), Some("Firefox"));
        let b = client_key(Some("10.0.0.1"), Some("Chrome"));

        assert_ne!(a, b);
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let parts = parts(&[("x-forwarded-for", "1.1.1.1")], Some("192.168.0.9:5555"));

        assert_eq!(client_ip(&parts, false).as_deref(), Some("192.168.0.9"));
    }

    #[test]
    fn test_forwarded_headers_behind_proxy() {
        let p = parts(
            &[("x-forwarded-for", "203.0.113.7, 10.0.0.1")],
            Some("10.0.0.1:80"),
        );
        assert_eq!(client_ip(&p, true).as_deref(), Some("203.0.113.7"));

        let p = parts(&[("x-real-ip", "198.51.100.2")], Some("10.0.0.1:80"));
        assert_eq!(client_ip(&p, true).as_deref(), Some("198.51.100.2"));

        let p = parts(&[], Some("10.0.0.1:80"));
        assert_eq!(client_ip(&p, true).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_client_key_for_request() {
        let p = parts(&[("user-agent", "Mozilla/5.0")], Some("127.0.0.1:1234"));

        assert_eq!(client_key_for(&p, false), "127.0.0.1:Mozilla/5.0");
    }
}
