//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → director.rs (route lookup, outbound rewrite)
//!     → hyper client forwards to the backend
//!     → response streamed back to the client
//! ```

pub mod director;
pub mod request;
pub mod server;

pub use director::{Directed, DirectError, Director};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
