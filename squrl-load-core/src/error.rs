//! Core error types
//!
//! None of these ever reach the load engine: the processor converts them into
//! the `hook.errors` counter at the hook boundary.

use thiserror::Error;

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Malformed identifier '{value}': expected {expected_len} characters from [A-Za-z0-9]")]
    MalformedIdentifier { value: String, expected_len: usize },

    #[error("Seed slot {0} is outside 1..={max}", max = crate::session::SEED_POOL_SIZE)]
    SeedIndexOutOfRange(usize),

    #[error(
        "Too many seed codes: {0} supplied, at most {max} fit the pool",
        max = crate::session::SEED_POOL_SIZE
    )]
    SeedPoolOverflow(usize),

    #[error("Hook '{hook}' panicked: {message}")]
    HookPanicked { hook: &'static str, message: String },
}
