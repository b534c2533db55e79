//! Metric emission seam
//!
//! Every classifying or validating component writes into a [`MetricsSink`].
//! The load engine owns aggregation; components never read values back.
//! [`InMemorySink`] is the aggregation point used by the bundled HTTP driver
//! and by tests.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Counter names emitted outside the per-endpoint families.
pub mod names {
    pub const CACHE_HIT: &str = "cache.hit";
    pub const CACHE_MISS: &str = "cache.miss";
    pub const WAF_BLOCKED: &str = "waf.blocked";
    pub const RATE_LIMIT_TOTAL: &str = "rate_limit.total";

    pub const DEDUP_SUCCESS: &str = "dedup.success";
    pub const DEDUP_FAILURE: &str = "dedup.failure";
    pub const DEDUP_MISSING_DATA: &str = "dedup.missing_data";

    pub const VALIDATION_JSON_PARSE_ERROR: &str = "validation.json_parse_error";
    pub const VALIDATION_MISSING_FIELDS: &str = "validation.missing_fields";
    pub const VALIDATION_COMPLETE_RESPONSE: &str = "validation.complete_response";
    pub const VALIDATION_INVALID_URL_FORMAT: &str = "validation.invalid_url_format";
    pub const VALIDATION_MISSING_LOCATION_HEADER: &str = "validation.missing_location_header";
    pub const VALIDATION_INVALID_REDIRECT_URL: &str = "validation.invalid_redirect_url";
    pub const VALIDATION_VALID_REDIRECT: &str = "validation.valid_redirect";

    pub const PERFORMANCE_SLOW: &str = "performance.slow_response";
    pub const PERFORMANCE_VERY_SLOW: &str = "performance.very_slow_response";
    pub const PERFORMANCE_FAST: &str = "performance.fast_response";

    pub const HOOK_ERRORS: &str = "hook.errors";
    pub const HTTP_TRANSPORT_ERRORS: &str = "http.transport_errors";
}

/// Write-only metrics surface shared by every virtual-user session.
pub trait MetricsSink: Send + Sync {
    /// Add `delta` to the named counter
    fn counter(&self, name: &str, delta: u64);

    /// Record one sample for the named histogram
    fn histogram(&self, name: &str, value: f64);

    fn increment(&self, name: &str) {
        self.counter(name, 1);
    }
}

/// Thread-safe in-process aggregation.
///
/// Samples of one histogram keep their arrival order.
#[derive(Debug, Default)]
pub struct InMemorySink {
    counters: Mutex<HashMap<String, u64>>,
    histograms: Mutex<HashMap<String, Vec<f64>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter, zero if it never fired
    pub fn counter_value(&self, name: &str) -> u64 {
        self.counters.lock().get(name).copied().unwrap_or(0)
    }

    /// Samples recorded for a histogram, in emission order
    pub fn histogram_samples(&self, name: &str) -> Vec<f64> {
        self.histograms.lock().get(name).cloned().unwrap_or_default()
    }

    /// Names of all counters that fired at least once, sorted
    pub fn counter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.counters.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.counters.lock().is_empty() && self.histograms.lock().is_empty()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .lock()
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect();

        let histograms = self
            .histograms
            .lock()
            .iter()
            .filter_map(|(name, samples)| {
                HistogramSummary::from_samples(samples).map(|summary| (name.clone(), summary))
            })
            .collect();

        MetricsSnapshot {
            counters,
            histograms,
        }
    }
}

impl MetricsSink for InMemorySink {
    fn counter(&self, name: &str, delta: u64) {
        *self.counters.lock().entry(name.to_string()).or_insert(0) += delta;
    }

    fn histogram(&self, name: &str, value: f64) {
        self.histograms
            .lock()
            .entry(name.to_string())
            .or_default()
            .push(value);
    }
}

/// Point-in-time view of everything an [`InMemorySink`] aggregated
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub histograms: BTreeMap<String, HistogramSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl HistogramSummary {
    /// Nearest-rank percentiles. `None` for an empty sample set.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let percentile = |p: f64| {
            let rank = (p * count as f64 / 100.0).ceil() as usize;
            sorted[rank.clamp(1, count) - 1]
        };

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sorted.iter().sum::<f64>() / count as f64,
            p50: percentile(50.0),
            p95: percentile(95.0),
            p99: percentile(99.0),
        })
    }
}
