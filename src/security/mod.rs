//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Routed request:
//!     → headers.rs (sanitize, regenerate X-Forwarded-*)
//!     → Forward to backend
//! ```
//!
//! # Design Decisions
//! - No trust in client-supplied forwarding headers

pub mod headers;
