//! Logging setup for the squrl load harness
//!
//! Components emit diagnostics through `tracing`; this crate installs the
//! global subscriber from the logging configuration domain.

pub mod init;

pub use init::{init_logging_from_config, init_simple_tracing};
pub use squrl_load_config::domains::logging::{LogFormat, LogLevel, LoggingConfig};
