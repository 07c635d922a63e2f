//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Publish a first route table before any traffic is accepted
//! - Start background tasks (reconciler, admin API, metrics)
//! - Bind the proxy listener last and serve until shutdown
//!
//! # Design Decisions
//! - Configuration and infrastructure errors are fatal
//! - A registry outage is not: the proxy starts with an empty table and
//!   picks routes up on the next cycle

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::admin::{self, AdminState};
use crate::config::ProxyConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::registry::{self, FetchError};
use crate::routing::{Reconciler, RouteStore};
use crate::tls::{self, store, DirCertificateStore, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("certificate store unusable: {0}")]
    CertificateStore(#[from] StoreError),

    #[error("registry client unavailable: {0}")]
    Registry(#[from] FetchError),

    #[error("TLS setup failed: {0}")]
    Tls(#[source] std::io::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bring the proxy up and serve until `shutdown` fires.
pub async fn run(config: ProxyConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    tls::install_crypto_provider();

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    if let Some(path) = &config.certificates.storage_path {
        let cert_store = DirCertificateStore::open(path).await?;
        store::probe(&cert_store).await?;
    }

    let fetcher = registry::from_config(&config.registry.source).await?;
    let routes = Arc::new(RouteStore::new());
    let reconciler = Reconciler::new(fetcher, routes.clone(), &config.registry);

    if reconciler.reconcile_once().await.is_err() {
        tracing::warn!("Initial registry fetch failed, starting with no routes");
    }
    let reconcile_task = reconciler.spawn(shutdown.subscribe());

    if config.admin.enabled {
        let listener = bind(&config.admin.bind_address).await?;
        let state = AdminState::new(routes.clone(), &config.admin.api_key);
        let admin_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = admin::serve(listener, state, admin_shutdown).await {
                tracing::error!(error = %e, "Admin API stopped");
            }
        });
    }

    let server = HttpServer::new(config.clone(), routes);
    match &config.listener.tls {
        Some(tls_config) => {
            let rustls = tls::load_tls_config(tls_config)
                .await
                .map_err(StartupError::Tls)?;
            let addr = parse_addr(&config.listener.bind_address)?;
            server
                .run_tls(addr, rustls, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)?;
        }
        None => {
            let listener = bind(&config.listener.bind_address).await?;
            server
                .run(listener, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)?;
        }
    }

    let _ = reconcile_task.await;
    Ok(())
}

fn parse_addr(address: &str) -> Result<SocketAddr, StartupError> {
    address.parse().map_err(|e| StartupError::Bind {
        address: address.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
    })
}

async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    let addr = parse_addr(address)?;
    TcpListener::bind(addr).await.map_err(|source| StartupError::Bind {
        address: address.to_string(),
        source,
    })
}
