//! Synthetic request inputs: target URLs and user-agent strings

use chrono::{DateTime, Utc};
use rand::Rng;

const DOMAINS: [&str; 6] = [
    "example.com",
    "example.org",
    "example.net",
    "test-site.example",
    "demo-shop.example",
    "docs.example.io",
];

const PATH_SEGMENTS: [&str; 6] = [
    "article",
    "product",
    "blog-post",
    "landing-page",
    "docs",
    "campaign",
];

/// Upper bound of the random id embedded in generated URLs
const MAX_URL_ID: u32 = 10_000;

pub const USER_AGENTS: [&str; 8] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.43 Mobile Safari/537.36",
    "Mozilla/5.0 (iPad; CPU OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/23.0 Chrome/115.0.0.0 Mobile Safari/537.36",
];

/// `https://{domain}/{path}-{id}-{timestamp}` with a microsecond timestamp.
pub fn make_test_url() -> String {
    make_test_url_with(&mut rand::rng(), Utc::now())
}

pub fn make_test_url_with<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> String {
    let domain = DOMAINS[rng.random_range(0..DOMAINS.len())];
    let path = PATH_SEGMENTS[rng.random_range(0..PATH_SEGMENTS.len())];
    let id = rng.random_range(1..=MAX_URL_ID);
    format!("https://{domain}/{path}-{id}-{}", now.timestamp_micros())
}

pub fn make_user_agent() -> &'static str {
    make_user_agent_with(&mut rand::rng())
}

pub fn make_user_agent_with<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USER_AGENTS[rng.random_range(0..USER_AGENTS.len())]
}
