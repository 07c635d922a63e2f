//! Request direction: pick a backend and rewrite the outbound request.
//!
//! # Responsibilities
//! - Build the `host/path` lookup target from an inbound request
//! - Resolve it against the current route table
//! - Rewrite scheme, authority and path for the chosen backend
//! - Adjust forwarding headers
//!
//! # Design Decisions
//! - One table snapshot per request; never re-read mid-rewrite
//! - The port in the Host header is not part of the lookup
//! - The query string survives the rewrite untouched
//! - `http::Uri` only carries the escaped path, so one match covers both the
//!   decoded and raw forms

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{header, HeaderValue, Request, Uri};
use std::sync::Arc;
use thiserror::Error;

use crate::routing::matcher::join_target;
use crate::routing::RouteStore;
use crate::security::headers;

#[derive(Debug, Error)]
pub enum DirectError {
    /// Nothing in the table covers the target, not even the bare host.
    #[error("no route for {0:?}")]
    NoRoute(String),

    #[error("request carries no host")]
    MissingHost,

    #[error("cannot rewrite request for backend {backend:?}: {reason}")]
    InvalidRewrite { backend: String, reason: String },
}

/// Where a request was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directed {
    /// Normalized lookup target.
    pub target: String,
    /// Routing key that matched.
    pub key: String,
    /// Backend authority the request now points at.
    pub backend: String,
    /// Rewritten path, always starting with `/`.
    pub path: String,
}

/// Rewrites requests according to the published route table.
#[derive(Debug, Clone)]
pub struct Director {
    store: Arc<RouteStore>,
}

impl Director {
    pub fn new(store: Arc<RouteStore>) -> Self {
        Self { store }
    }

    /// Point `request` at its backend, or report it unroutable.
    ///
    /// The request is left untouched on error.
    pub fn direct<B>(&self, request: &mut Request<B>) -> Result<Directed, DirectError> {
        let host = request_host(request).ok_or(DirectError::MissingHost)?.to_string();
        let lookup_host = strip_port(&host);
        if !is_usable_host(lookup_host) {
            return Err(DirectError::MissingHost);
        }
        let target = join_target(lookup_host, request.uri().path());

        tracing::debug!(host = %host, path = %request.uri().path(), "Lookup");

        let (key, backend, residual) = {
            let table = self.store.load();
            let found = table
                .lookup(&target)
                .ok_or_else(|| DirectError::NoRoute(target.clone()))?;
            (found.key.to_string(), found.backend.to_string(), found.residual)
        };

        let path = format!("/{residual}");
        let uri = rewrite_uri(request.uri(), &backend, &path)?;

        if !request.headers().contains_key(header::HOST) {
            if let Ok(value) = HeaderValue::from_str(&host) {
                request.headers_mut().insert(header::HOST, value);
            }
        }
        *request.uri_mut() = uri;

        let headers = request.headers_mut();
        headers::mark_forwarded_https(headers);
        headers::pin_user_agent(headers);
        headers::strip_forwarded_for(headers);

        tracing::debug!(target = %target, uri = %request.uri(), "Routing");

        Ok(Directed {
            target,
            key,
            backend,
            path,
        })
    }
}

fn request_host<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .or_else(|| request.uri().authority().map(Authority::as_str))
}

/// `example.com:8443` → `example.com`; bracketed IPv6 keeps its brackets.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return host.find(']').map_or(host, |end| &host[..=end]);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// A host must stay the first segment of the lookup target after normalization.
fn is_usable_host(host: &str) -> bool {
    !matches!(host, "" | "." | "..") && !host.contains(['/', '\\'])
}

fn rewrite_uri(original: &Uri, backend: &str, path: &str) -> Result<Uri, DirectError> {
    let invalid = |reason: String| DirectError::InvalidRewrite {
        backend: backend.to_string(),
        reason,
    };

    let authority = backend
        .parse::<Authority>()
        .map_err(|e| invalid(e.to_string()))?;
    let path_and_query = match original.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    }
    .parse::<PathAndQuery>()
    .map_err(|e| invalid(e.to_string()))?;

    let mut parts = original.clone().into_parts();
    parts.scheme = Some(Scheme::HTTP);
    parts.authority = Some(authority);
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteTable;
    use crate::security::headers::{X_FORWARDED_FOR, X_FORWARDED_PROTO};
    use std::collections::HashMap;

    fn director() -> Director {
        let entries = HashMap::from([
            ("git.example.com".to_string(), "git.git:8080".to_string()),
            ("git.example.com/about".to_string(), "about.git:8080".to_string()),
        ]);
        Director::new(Arc::new(RouteStore::with_table(RouteTable::from_entries(entries))))
    }

    fn request(host: &str, uri: &str) -> Request<()> {
        Request::builder()
            .uri(uri)
            .header(header::HOST, host)
            .body(())
            .unwrap()
    }

    #[test]
    fn test_rewrites_to_backend() {
        let mut req = request("git.example.com", "/about/team?lang=en");
        let directed = director().direct(&mut req).unwrap();

        assert_eq!(directed.key, "git.example.com/about");
        assert_eq!(directed.backend, "about.git:8080");
        assert_eq!(directed.path, "/team");
        assert_eq!(req.uri().to_string(), "http://about.git:8080/team?lang=en");
        assert_eq!(req.headers()[header::HOST], "git.example.com");
    }

    #[test]
    fn test_exact_match_has_root_path() {
        let mut req = request("git.example.com", "/about");
        director().direct(&mut req).unwrap();
        assert_eq!(req.uri().to_string(), "http://about.git:8080/");
    }

    #[test]
    fn test_host_fallback_keeps_full_path() {
        let mut req = request("git.example.com", "/user/repo.git/info/refs");
        director().direct(&mut req).unwrap();
        assert_eq!(req.uri().path(), "/user/repo.git/info/refs");
        assert_eq!(req.uri().authority().unwrap().as_str(), "git.git:8080");
    }

    #[test]
    fn test_escaped_path_kept_escaped() {
        let mut req = request("git.example.com", "/a%2Fb/c%20d");
        director().direct(&mut req).unwrap();
        assert_eq!(req.uri().path(), "/a%2Fb/c%20d");
    }

    #[test]
    fn test_port_ignored_for_lookup() {
        let mut req = request("git.example.com:8443", "/");
        assert_eq!(director().direct(&mut req).unwrap().backend, "git.git:8080");
    }

    #[test]
    fn test_forwarding_headers() {
        let mut req = Request::builder()
            .uri("/")
            .header(header::HOST, "git.example.com")
            .header(X_FORWARDED_FOR, "6.6.6.6")
            .body(())
            .unwrap();
        director().direct(&mut req).unwrap();

        assert_eq!(req.headers()[X_FORWARDED_PROTO], "https");
        assert_eq!(req.headers()[header::USER_AGENT], "");
        assert!(!req.headers().contains_key(X_FORWARDED_FOR));
    }

    #[test]
    fn test_user_agent_preserved() {
        let mut req = Request::builder()
            .uri("/")
            .header(header::HOST, "git.example.com")
            .header(header::USER_AGENT, "git/2.43")
            .body(())
            .unwrap();
        director().direct(&mut req).unwrap();
        assert_eq!(req.headers()[header::USER_AGENT], "git/2.43");
    }

    #[test]
    fn test_unroutable_left_untouched() {
        let mut req = request("other.example.com", "/x");
        let err = director().direct(&mut req).unwrap_err();

        assert!(matches!(err, DirectError::NoRoute(ref t) if t == "other.example.com/x"));
        assert_eq!(req.uri().to_string(), "/x");
        assert!(!req.headers().contains_key(X_FORWARDED_PROTO));
    }

    #[test]
    fn test_authority_form_without_host_header() {
        let mut req = Request::builder()
            .uri("https://git.example.com/about")
            .body(())
            .unwrap();
        director().direct(&mut req).unwrap();
        assert_eq!(req.uri().to_string(), "http://about.git:8080/");
        assert_eq!(req.headers()[header::HOST], "git.example.com");
    }

    #[test]
    fn test_missing_host() {
        let mut req = Request::builder().uri("/").body(()).unwrap();
        assert!(matches!(director().direct(&mut req), Err(DirectError::MissingHost)));
    }

    #[test]
    fn test_dot_hosts_cannot_borrow_path_routes() {
        for host in [".", "..", ":8080", "..:443"] {
            let mut req = request(host, "/git.example.com/about/x");
            assert!(
                matches!(director().direct(&mut req), Err(DirectError::MissingHost)),
                "host {host:?}"
            );
            assert_eq!(req.uri().to_string(), "/git.example.com/about/x");
        }
    }

    #[test]
    fn test_host_with_slash_rejected() {
        let mut req = Request::builder()
            .uri("/x")
            .header(header::HOST, "git.example.com/about")
            .body(())
            .unwrap();
        assert!(matches!(director().direct(&mut req), Err(DirectError::MissingHost)));
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("example.com:443"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
    }
}
