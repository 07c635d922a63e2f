//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, escaped path)
//!     → RouteStore::load (current immutable RouteTable)
//!     → matcher.rs (longest path-prefix match)
//!     → Return: backend + residual path, or no match
//!
//! Route Table Construction (every refresh interval):
//!     registry snapshot (ServiceRecord[])
//!     → table.rs (annotations → entries, derive domains)
//!     → reconciler.rs (atomic publish into RouteStore)
//! ```
//!
//! # Design Decisions
//! - Tables are immutable once published; refresh swaps the whole table
//! - No regex in hot path (segment-prefix matching only)
//! - Deterministic: same table and target always give the same match
//! - Most specific key wins

pub mod matcher;
pub mod reconciler;
pub mod table;

pub use matcher::RouteMatch;
pub use reconciler::{CycleReport, Reconciler, RouteStore};
pub use table::RouteTable;
