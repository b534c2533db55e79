//! HTTP driver for the squrl load harness
//!
//! Executes the core's generated inputs as real requests with reqwest,
//! builds response descriptors and feeds them through the processor hooks.

pub mod client;
pub mod config;
pub mod errors;
pub mod journey;

// Re-export main types for convenience
pub use client::ProbeClient;
pub use config::ClientConfig;
pub use errors::HttpError;
pub use journey::{run_sessions, Journey, JourneyOutcome};
