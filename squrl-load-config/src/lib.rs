//! Domain-driven configuration management for the squrl load harness
//!
//! Configuration is split by functional domain (target service, probe
//! behaviour, logging), each with its own defaults and validation, and every
//! domain can be overridden from `SQURL_LOAD_*` environment variables.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    logging::LoggingConfig, probe::ProbeConfig, target::TargetConfig, LoadConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
