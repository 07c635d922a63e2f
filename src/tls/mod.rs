//! TLS subsystem.
//!
//! # Data Flow
//! ```text
//! Certificate issuance (external ACME client)
//!     → admission.rs (is the host routed right now?)
//!     → store.rs (persist account keys and certificates)
//!
//! Listener:
//!     pem.rs (static cert/key from config) → axum-server rustls
//! ```
//!
//! # Design Decisions
//! - Admission reads the live route table, never a captured copy
//! - A refusal is a policy error, not a transient failure
//! - The store is opaque bytes by key; the proxy never inspects entries

pub mod admission;
pub mod pem;
pub mod store;

pub use admission::{AdmissionError, DomainAdmission};
pub use pem::{install_crypto_provider, load_tls_config};
pub use store::{CertificateStore, DirCertificateStore, StoreError};
