//! Outcome classification for completed request/response pairs
//!
//! Endpoint detection is a substring heuristic on the request path with a
//! fixed precedence: `/create`, then `/stats/`, then any other GET is a
//! redirect lookup. A short code that itself contains `create` is therefore
//! counted against the create endpoint; that ambiguity is kept as-is.

use crate::metrics::{names, MetricsSink};
use crate::types::{HttpMethod, RequestDescriptor, ResponseDescriptor};
use squrl_load_config::ProbeConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Create,
    Stats,
    Redirect,
}

impl Endpoint {
    /// `None` for requests matching no endpoint (e.g. a POST elsewhere)
    pub fn detect(request: &RequestDescriptor) -> Option<Self> {
        let path = request.path();
        if path.contains("/create") {
            Some(Endpoint::Create)
        } else if path.contains("/stats/") {
            Some(Endpoint::Stats)
        } else if request.method == HttpMethod::Get {
            Some(Endpoint::Redirect)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Create => "create",
            Endpoint::Stats => "stats",
            Endpoint::Redirect => "redirect",
        }
    }

    /// `{endpoint}.{suffix}`, e.g. `create.rate_limited`
    pub fn metric(&self, suffix: &str) -> String {
        format!("{}.{}", self.as_str(), suffix)
    }

    /// Status-specific sub-counter suffix, if the status is one this
    /// endpoint distinguishes
    fn outcome_suffix(&self, status: u16) -> Option<&'static str> {
        match (self, status) {
            (Endpoint::Create, 200..=299) => Some("success"),
            (Endpoint::Create, 409) => Some("duplicate"),
            (Endpoint::Stats, 200) => Some("success"),
            (Endpoint::Stats | Endpoint::Redirect, 404) => Some("not_found"),
            (Endpoint::Redirect, 301 | 302) => Some("success"),
            (_, 429) => Some("rate_limited"),
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Emits request/latency/outcome metrics for every completed call
#[derive(Debug, Clone)]
pub struct OutcomeClassifier {
    cache_status_headers: Vec<String>,
}

impl Default for OutcomeClassifier {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}

impl OutcomeClassifier {
    pub fn new<I, S>(cache_status_headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cache_status_headers: cache_status_headers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.cache_status_headers.iter().cloned())
    }

    /// Classify one pair. Holds no state between calls, so classifying the
    /// same pair twice emits everything twice.
    pub fn classify(
        &self,
        request: &RequestDescriptor,
        response: &ResponseDescriptor,
        sink: &dyn MetricsSink,
    ) -> Option<Endpoint> {
        let endpoint = Endpoint::detect(request);

        if let Some(endpoint) = endpoint {
            sink.increment(&endpoint.metric("requests"));
            sink.histogram(&endpoint.metric("response_time"), response.elapsed_ms());

            if let Some(suffix) = endpoint.outcome_suffix(response.status) {
                sink.increment(&endpoint.metric(suffix));
            }

            if endpoint == Endpoint::Redirect && response.is_redirect() {
                match self.cache_status(response) {
                    Some(CacheStatus::Hit) => sink.increment(names::CACHE_HIT),
                    Some(CacheStatus::Miss) => sink.increment(names::CACHE_MISS),
                    None => {}
                }
            }
        }

        match response.status {
            403 => sink.increment(names::WAF_BLOCKED),
            429 => sink.increment(names::RATE_LIMIT_TOTAL),
            _ => {}
        }

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            endpoint = endpoint.map(|e| e.as_str()).unwrap_or("unclassified"),
            "Classified response"
        );

        endpoint
    }

    /// First configured header present decides; its value is matched
    /// case-insensitively against "hit", then "miss".
    pub fn cache_status(&self, response: &ResponseDescriptor) -> Option<CacheStatus> {
        let value = self
            .cache_status_headers
            .iter()
            .find_map(|name| response.header(name))?
            .to_ascii_lowercase();

        if value.contains("hit") {
            Some(CacheStatus::Hit)
        } else if value.contains("miss") {
            Some(CacheStatus::Miss)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InMemorySink;
    use std::time::Duration;

    fn classify(request: RequestDescriptor, response: ResponseDescriptor) -> InMemorySink {
        let sink = InMemorySink::new();
        OutcomeClassifier::default().classify(&request, &response, &sink);
        sink
    }

    #[test]
    fn test_endpoint_precedence() {
        assert_eq!(Endpoint::detect(&RequestDescriptor::post("/create")), Some(Endpoint::Create));
        assert_eq!(Endpoint::detect(&RequestDescriptor::get("/create")), Some(Endpoint::Create));
        assert_eq!(
            Endpoint::detect(&RequestDescriptor::get("/stats/abc123")),
            Some(Endpoint::Stats)
        );
        assert_eq!(Endpoint::detect(&RequestDescriptor::get("/abc123")), Some(Endpoint::Redirect));
        assert_eq!(Endpoint::detect(&RequestDescriptor::post("/abc123")), None);
        // `/stats` without a trailing slash is a bare lookup
        assert_eq!(Endpoint::detect(&RequestDescriptor::get("/stats")), Some(Endpoint::Redirect));
        // known ambiguity: a code containing "create" counts as create
        assert_eq!(
            Endpoint::detect(&RequestDescriptor::get("/created1")),
            Some(Endpoint::Create)
        );
        assert_eq!(
            Endpoint::detect(&RequestDescriptor::post("/stats/create")),
            Some(Endpoint::Create)
        );
    }

    #[test]
    fn test_create_outcomes() {
        let sink = classify(
            RequestDescriptor::post("/create"),
            ResponseDescriptor::new(201).with_elapsed(Duration::from_millis(40)),
        );
        assert_eq!(sink.counter_value("create.requests"), 1);
        assert_eq!(sink.counter_value("create.success"), 1);
        assert_eq!(sink.histogram_samples("create.response_time"), vec![40.0]);

        let sink = classify(RequestDescriptor::post("/create"), ResponseDescriptor::new(409));
        assert_eq!(sink.counter_value("create.duplicate"), 1);
        assert_eq!(sink.counter_value("create.success"), 0);

        let sink = classify(RequestDescriptor::post("/create"), ResponseDescriptor::new(429));
        assert_eq!(sink.counter_value("create.rate_limited"), 1);
        assert_eq!(sink.counter_value("rate_limit.total"), 1);

        let sink = classify(RequestDescriptor::post("/create"), ResponseDescriptor::new(400));
        assert_eq!(sink.counter_names(), vec!["create.requests"]);
    }

    #[test]
    fn test_stats_outcomes() {
        let sink = classify(RequestDescriptor::get("/stats/abc123"), ResponseDescriptor::new(200));
        assert_eq!(sink.counter_value("stats.requests"), 1);
        assert_eq!(sink.counter_value("stats.success"), 1);

        // only exactly 200 counts as stats success
        let sink = classify(RequestDescriptor::get("/stats/abc123"), ResponseDescriptor::new(204));
        assert_eq!(sink.counter_value("stats.success"), 0);

        let sink = classify(RequestDescriptor::get("/stats/abc123"), ResponseDescriptor::new(404));
        assert_eq!(sink.counter_value("stats.not_found"), 1);

        let sink = classify(RequestDescriptor::get("/stats/abc123"), ResponseDescriptor::new(429));
        assert_eq!(sink.counter_value("stats.rate_limited"), 1);
        assert_eq!(sink.counter_value("rate_limit.total"), 1);
    }

    #[test]
    fn test_redirect_outcomes_and_cache() {
        let sink = classify(
            RequestDescriptor::get("/abc123"),
            ResponseDescriptor::new(302).with_header("cf-cache-status", "HIT"),
        );
        assert_eq!(sink.counter_value("redirect.requests"), 1);
        assert_eq!(sink.counter_value("redirect.success"), 1);
        assert_eq!(sink.counter_value("cache.hit"), 1);
        assert_eq!(sink.counter_value("cache.miss"), 0);

        let sink = classify(
            RequestDescriptor::get("/abc123"),
            ResponseDescriptor::new(301).with_header("X-Cache", "Miss from cloudfront"),
        );
        assert_eq!(sink.counter_value("redirect.success"), 1);
        assert_eq!(sink.counter_value("cache.miss"), 1);

        let sink = classify(RequestDescriptor::get("/abc123"), ResponseDescriptor::new(302));
        assert_eq!(sink.counter_value("cache.hit") + sink.counter_value("cache.miss"), 0);

        // cache status is only inspected on successful redirects
        let sink = classify(
            RequestDescriptor::get("/abc123"),
            ResponseDescriptor::new(404).with_header("x-cache", "Hit from cloudfront"),
        );
        assert_eq!(sink.counter_value("redirect.not_found"), 1);
        assert_eq!(sink.counter_value("cache.hit"), 0);

        let sink = classify(RequestDescriptor::get("/abc123"), ResponseDescriptor::new(429));
        assert_eq!(sink.counter_value("redirect.rate_limited"), 1);
        assert_eq!(sink.counter_value("rate_limit.total"), 1);
    }

    #[test]
    fn test_waf_block_on_any_endpoint() {
        for request in [
            RequestDescriptor::post("/create"),
            RequestDescriptor::get("/stats/abc123"),
            RequestDescriptor::get("/abc123"),
            RequestDescriptor::post("/elsewhere"),
        ] {
            let sink = classify(request, ResponseDescriptor::new(403));
            assert_eq!(sink.counter_value("waf.blocked"), 1);
            for endpoint in ["create", "stats", "redirect"] {
                assert_eq!(sink.counter_value(&format!("{endpoint}.success")), 0);
            }
        }
    }

    #[test]
    fn test_unclassified_request_only_gets_cross_cutting_counters() {
        let sink = classify(RequestDescriptor::post("/abc123"), ResponseDescriptor::new(429));
        assert_eq!(sink.counter_names(), vec!["rate_limit.total"]);
    }

    #[test]
    fn test_cache_header_order() {
        let classifier = OutcomeClassifier::new(["cf-cache-status", "x-cache"]);
        let response = ResponseDescriptor::new(302)
            .with_header("x-cache", "Hit from cloudfront")
            .with_header("cf-cache-status", "MISS");
        assert_eq!(classifier.cache_status(&response), Some(CacheStatus::Miss));

        let classifier = OutcomeClassifier::new(["x-cache"]);
        assert_eq!(classifier.cache_status(&response), Some(CacheStatus::Hit));

        let response = ResponseDescriptor::new(302).with_header("x-cache", "Error from cloudfront");
        assert_eq!(classifier.cache_status(&response), None);
    }
}
