//! Route matching logic.
//!
//! # Responsibilities
//! - Normalize a `host/path` lookup target
//! - Find the longest routing key that is a segment prefix of the target
//! - Return the unmatched remainder as the residual path
//!
//! # Design Decisions
//! - Matching is case-sensitive and slash-delimited only
//! - No wildcards or regex; cost is bounded by the path's segment count
//! - A bare host key is the fallback for every path under that host
//! - `..` segments never climb above the host

use std::collections::HashMap;

/// A successful lookup, borrowing from the table it was resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The routing key that matched.
    pub key: &'a str,
    /// Backend target (`address:port`) for the key.
    pub backend: &'a str,
    /// Path below the matched prefix, without a leading slash.
    pub residual: String,
}

/// Build a lookup target from a host and an escaped request path.
pub fn join_target(host: &str, path: &str) -> String {
    let mut joined = String::with_capacity(host.len() + path.len() + 1);
    joined.push_str(host);
    joined.push('/');
    joined.push_str(path);
    normalize(&joined)
}

/// Collapse empty and `.` segments and resolve `..`, keeping the host in place.
pub fn normalize(target: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.len() > 1 {
                    segments.pop();
                }
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Resolve `target` against `entries`, most specific key first.
///
/// Returns `None` once the bare host has failed to match.
pub fn match_target<'a>(
    entries: &'a HashMap<String, String>,
    target: &str,
) -> Option<RouteMatch<'a>> {
    let target = normalize(target);
    let mut end = target.len();

    while end > 0 {
        let candidate = &target[..end];
        if let Some((key, backend)) = entries.get_key_value(candidate) {
            let residual = target[end..].strip_prefix('/').unwrap_or("").to_string();
            return Some(RouteMatch {
                key,
                backend,
                residual,
            });
        }
        end = candidate.rfind('/').unwrap_or(0);
    }

    None
}
