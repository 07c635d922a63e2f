//! Immutable routing table and its construction from a registry snapshot.
//!
//! # Responsibilities
//! - Turn annotated service records into routing entries
//! - Derive the admissible domain set from the entries
//! - Answer lookups through the matcher
//!
//! # Design Decisions
//! - Built in one pass, never mutated after construction
//! - Duplicate keys: the record seen last wins
//! - Records without ports are skipped, never fatal

use std::collections::{HashMap, HashSet};

use crate::registry::ServiceRecord;
use crate::routing::matcher::{match_target, RouteMatch};

/// Routing keys mapped to backend targets, plus the hosts they cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: HashMap<String, String>,
    domains: HashSet<String>,
}

impl RouteTable {
    /// Build a table from a registry snapshot.
    ///
    /// Each annotation in `annotation_keys` found on a record contributes one
    /// entry pointing at `<name>.<namespace>:<first port>`.
    pub fn build(records: &[ServiceRecord], annotation_keys: &[String]) -> Self {
        let mut entries = HashMap::new();

        for record in records {
            let Some(target) = record.backend_target() else {
                tracing::debug!(
                    service = %record.name,
                    namespace = %record.namespace,
                    "Skipping service without ports"
                );
                continue;
            };

            for annotation in annotation_keys {
                if let Some(key) = record.annotations.get(annotation) {
                    entries.insert(key.clone(), target.clone());
                }
            }
        }

        Self::from_entries(entries)
    }

    /// Wrap an existing mapping, deriving the domain set from its keys.
    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        let domains = entries.keys().map(|k| domain_of(k).to_string()).collect();
        Self { entries, domains }
    }

    /// Resolve a `host/path` target to the most specific entry.
    pub fn lookup(&self, target: &str) -> Option<RouteMatch<'_>> {
        match_target(&self.entries, target)
    }

    /// Whether `host` is the host part of any routing key.
    pub fn contains_domain(&self, host: &str) -> bool {
        self.domains.contains(host)
    }

    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    pub fn domains(&self) -> &HashSet<String> {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn domain_of(key: &str) -> &str {
    key.split_once('/').map_or(key, |(host, _)| host)
}
