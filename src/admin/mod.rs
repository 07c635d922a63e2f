//! Admin API.
//!
//! Read-only views of the published route table plus the certificate
//! admission check, behind a bearer token.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::routing::RouteStore;
use crate::tls::DomainAdmission;

#[derive(Clone)]
pub struct AdminState {
    pub store: Arc<RouteStore>,
    pub admission: DomainAdmission,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(store: Arc<RouteStore>, api_key: &str) -> Self {
        Self {
            admission: DomainAdmission::new(store.clone()),
            store,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/routes", get(get_routes))
        .route("/admin/domains/{host}", get(get_domain))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

/// Serve the admin API on `listener` until shutdown.
pub async fn serve(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    tracing::info!(address = %listener.local_addr()?, "Admin API listening");
    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}
