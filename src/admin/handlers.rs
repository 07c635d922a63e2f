use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub routes: usize,
    pub domains: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteEntry {
    pub key: String,
    pub backend: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DomainDecision {
    pub host: String,
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let table = state.store.load();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        routes: table.len(),
        domains: table.domains().len(),
    })
}

pub async fn get_routes(State(state): State<AdminState>) -> Json<Vec<RouteEntry>> {
    let table = state.store.load_full();
    let mut routes: Vec<RouteEntry> = table
        .entries()
        .iter()
        .map(|(key, backend)| RouteEntry {
            key: key.clone(),
            backend: backend.clone(),
        })
        .collect();
    routes.sort_by(|a, b| a.key.cmp(&b.key));
    Json(routes)
}

/// Admission decision for certificate issuance; 403 carries the policy error.
pub async fn get_domain(
    State(state): State<AdminState>,
    Path(host): Path<String>,
) -> (StatusCode, Json<DomainDecision>) {
    match state.admission.check(&host) {
        Ok(()) => (
            StatusCode::OK,
            Json(DomainDecision {
                host,
                allowed: true,
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::FORBIDDEN,
            Json(DomainDecision {
                host,
                allowed: false,
                error: Some(e.to_string()),
            }),
        ),
    }
}
