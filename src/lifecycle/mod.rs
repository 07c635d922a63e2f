//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Metrics → Certificate store → Registry client → First reconcile
//!     → Reconciler task → Admin API → Proxy listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → reconciler, admin and proxy stop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: routes are published before traffic is accepted
//! - Listeners start last

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::StartupError;
