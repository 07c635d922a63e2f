//! Header manipulation for forwarded requests.
//!
//! # Responsibilities
//! - Mark requests as originally received over TLS
//! - Drop client-supplied X-Forwarded-For and regenerate it from the peer
//! - Strip hop-by-hop headers in both directions
//!
//! # Design Decisions
//! - Never trust existing X-Forwarded-For from clients
//! - An absent User-Agent is forwarded as empty rather than the client default

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use std::net::IpAddr;

pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "proxy-connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "upgrade",
];

/// TLS terminates here, so upstreams are told the client used https.
pub fn mark_forwarded_https(headers: &mut HeaderMap) {
    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));
}

/// Keep the HTTP client from inventing a User-Agent.
pub fn pin_user_agent(headers: &mut HeaderMap) {
    if !headers.contains_key(header::USER_AGENT) {
        headers.insert(header::USER_AGENT, HeaderValue::from_static(""));
    }
}

pub fn strip_forwarded_for(headers: &mut HeaderMap) {
    headers.remove(X_FORWARDED_FOR);
}

/// Append the peer address to X-Forwarded-For.
pub fn append_forwarded_for(headers: &mut HeaderMap, peer: IpAddr) {
    let value = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{existing}, {peer}"),
        _ => peer.to_string(),
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

/// Remove connection-scoped headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_by_hop_removed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-session"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-session", HeaderValue::from_static("abc"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));

        strip_hop_by_hop(&mut headers);

        assert!(!headers.contains_key(header::CONNECTION));
        assert!(!headers.contains_key("keep-alive"));
        assert!(!headers.contains_key("x-session"));
        assert!(headers.contains_key(header::ACCEPT));
    }

    #[test]
    fn test_forwarded_for_regenerated() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("6.6.6.6"));

        strip_forwarded_for(&mut headers);
        append_forwarded_for(&mut headers, "10.0.0.7".parse().unwrap());
        assert_eq!(headers[X_FORWARDED_FOR], "10.0.0.7");

        append_forwarded_for(&mut headers, "10.0.0.8".parse().unwrap());
        assert_eq!(headers[X_FORWARDED_FOR], "10.0.0.7, 10.0.0.8");
    }

    #[test]
    fn test_user_agent_pinned_only_when_absent() {
        let mut headers = HeaderMap::new();
        pin_user_agent(&mut headers);
        assert_eq!(headers[header::USER_AGENT], "");

        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        pin_user_agent(&mut headers);
        assert_eq!(headers[header::USER_AGENT], "curl/8.0");
    }
}
