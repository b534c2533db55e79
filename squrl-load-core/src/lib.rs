//! Request-level instrumentation for squrl load tests
//!
//! A load engine drives virtual users through the URL shortener. For every
//! step it asks this crate for request inputs (codes, URLs, user agents,
//! seed lookups) and hands back each completed request/response pair, which
//! is classified, validated and banded into metrics.
//!
//! - [`processor::Processor`] is the engine-facing hook surface
//! - [`session::SessionContext`] holds one virtual user's state
//! - [`metrics::MetricsSink`] is the write-only output seam

pub mod classifier;
pub mod dedup;
pub mod error;
pub mod identifier;
pub mod inputs;
pub mod metrics;
pub mod performance;
pub mod processor;
pub mod seed;
pub mod session;
pub mod types;
pub mod validator;

// Re-export commonly used types at the crate root
pub use classifier::{CacheStatus, Endpoint, OutcomeClassifier};
pub use dedup::{verify_dedup, DedupOutcome};
pub use error::{ProbeError, Result};
pub use identifier::{Identifier, CUSTOM_CODE_LEN, SHORT_CODE_LEN};
pub use metrics::{HistogramSummary, InMemorySink, MetricsSink, MetricsSnapshot};
pub use performance::LatencyBand;
pub use processor::Processor;
pub use seed::{select_seed, SeedSelection};
pub use session::{SeedPool, SessionContext, SEED_POOL_SIZE};
pub use types::{HttpMethod, RequestDescriptor, ResponseDescriptor};
pub use validator::{CreateValidation, RedirectValidation};
