//! Service registry access.
//!
//! # Data Flow
//! ```text
//! Registry (Kubernetes API / HTTP endpoint / TOML file)
//!     → RegistryFetcher::fetch (one full snapshot per call)
//!     → Vec<ServiceRecord>
//!     → routing::table builds the next RouteTable
//! ```
//!
//! # Design Decisions
//! - A failed fetch is an error, never an empty list: "no services" and
//!   "registry unreachable" must stay distinguishable
//! - Fetchers hold no routing state; every call is a fresh snapshot

pub mod file;
pub mod http;
pub mod kubernetes;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::RegistrySource;

pub use file::FileFetcher;
pub use http::HttpFetcher;
pub use kubernetes::KubernetesFetcher;

/// One service as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub name: String,
    pub namespace: String,
    /// Declared ports in order; the first one is used for routing.
    #[serde(default)]
    pub ports: Vec<u16>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

impl ServiceRecord {
    /// Address requests for this service are forwarded to, if it declares a port.
    pub fn backend_target(&self) -> Option<String> {
        self.ports
            .first()
            .map(|port| format!("{}.{}:{}", self.name, self.namespace, port))
    }
}

/// Errors surfaced by a registry fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Kubernetes API error: {0}")]
    Kubernetes(#[from] kube::Error),

    #[error("HTTP registry error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed registry document: {0}")]
    Decode(String),
}

/// Source of registry snapshots.
#[async_trait]
pub trait RegistryFetcher: Send + Sync {
    /// Return every service currently known to the registry.
    async fn fetch(&self) -> Result<Vec<ServiceRecord>, FetchError>;

    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;
}

/// Construct the fetcher selected by configuration.
pub async fn from_config(source: &RegistrySource) -> Result<Arc<dyn RegistryFetcher>, FetchError> {
    let fetcher: Arc<dyn RegistryFetcher> = match source {
        RegistrySource::Kubernetes => Arc::new(KubernetesFetcher::try_default().await?),
        RegistrySource::Http { url, timeout_secs } => Arc::new(HttpFetcher::new(
            url.clone(),
            Duration::from_secs(*timeout_secs),
        )?),
        RegistrySource::File { path } => Arc::new(FileFetcher::new(path.clone())),
    };
    tracing::info!(registry = fetcher.name(), "Registry client ready");
    Ok(fetcher)
}
