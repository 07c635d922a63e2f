//! Domain admission for automatic certificate issuance.
//!
//! A host is admissible while some published routing key names it. The
//! decision is read from the live [`RouteStore`] on every call, so hosts gain
//! and lose eligibility as the registry changes.

use std::sync::Arc;
use thiserror::Error;

use crate::routing::RouteStore;

/// Refusal returned to the issuance side. Not retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("host {0:?} not handled")]
    NotHandled(String),
}

/// Host policy backed by the current route table.
#[derive(Debug, Clone)]
pub struct DomainAdmission {
    store: Arc<RouteStore>,
}

impl DomainAdmission {
    pub fn new(store: Arc<RouteStore>) -> Self {
        Self { store }
    }

    /// Whether `host` may receive a certificate right now.
    pub fn allowed(&self, host: &str) -> bool {
        self.store.load().contains_domain(host)
    }

    /// Policy form of [`DomainAdmission::allowed`].
    pub fn check(&self, host: &str) -> Result<(), AdmissionError> {
        if self.allowed(host) {
            Ok(())
        } else {
            tracing::warn!(host = %host, "Certificate request for unrouted host refused");
            Err(AdmissionError::NotHandled(host.to_string()))
        }
    }
}
