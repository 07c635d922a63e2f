//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to startup, which wires every subsystem
//! ```
//!
//! # Design Decisions
//! - Config is read once at start-up; routes change through the registry, not the file
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, CertificateConfig, ListenerConfig, ObservabilityConfig, ProxyConfig,
    RegistryConfig, RegistrySource, TimeoutConfig, TlsConfig,
};
