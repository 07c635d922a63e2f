//! Registry-driven HTTP reverse proxy library.
//!
//! Routes are derived from service annotations in a registry (Kubernetes by
//! default) and published as immutable snapshots that request handling reads
//! without locking.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;
pub mod security;
pub mod tls;

pub use config::schema::ProxyConfig;
pub use http::{Director, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{Reconciler, RouteStore, RouteTable};
pub use tls::DomainAdmission;
