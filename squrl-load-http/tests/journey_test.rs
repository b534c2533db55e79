use serde_json::json;
use squrl_load_core::{
    DedupOutcome, InMemorySink, Processor, SeedPool, SessionContext, SEED_POOL_SIZE,
};
use squrl_load_http::{run_sessions, ClientConfig, Journey, ProbeClient};
use std::time::Duration;
use wiremock::matchers::{header_exists, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(base_url: &str) -> ProbeClient {
    ProbeClient::new(ClientConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        verify_ssl: true,
    })
    .unwrap()
}

async fn mount_shortener(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/create"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "short_code": "abc123",
            "short_url": "https://squrl.dev/abc123",
            "original_url": "https://example.com/landing",
            "expires_at": "2027-01-01T00:00:00Z"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/stats/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "short_code": "abc123",
            "clicks": 0
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/[A-Za-z0-9]+$"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "https://example.com/landing")
                .insert_header("x-cache", "Hit from cloudfront"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_journey_walks_every_endpoint() {
    let server = MockServer::start().await;
    mount_shortener(&server).await;

    let client = client_for(&server.uri());
    let processor = Processor::default();
    let sink = InMemorySink::new();
    let mut session = SessionContext::new();

    let outcome = Journey::new(&client, &processor, &sink)
        .run(&mut session)
        .await;

    assert_eq!(outcome.requests_sent, 5);
    assert_eq!(outcome.transport_errors(), 0);
    assert_eq!(outcome.dedup, Some(DedupOutcome::Success));

    assert_eq!(session.first_short_code(), Some("abc123"));
    assert_eq!(session.second_short_code(), Some("abc123"));
    assert_eq!(session.last_created_code(), Some("abc123"));

    assert_eq!(sink.counter_value("create.requests"), 3);
    assert_eq!(sink.counter_value("create.success"), 3);
    assert_eq!(sink.counter_value("validation.complete_response"), 3);
    assert_eq!(sink.counter_value("dedup.success"), 1);
    assert_eq!(sink.counter_value("redirect.requests"), 1);
    assert_eq!(sink.counter_value("redirect.success"), 1);
    assert_eq!(sink.counter_value("cache.hit"), 1);
    assert_eq!(sink.counter_value("validation.valid_redirect"), 1);
    assert_eq!(sink.counter_value("stats.requests"), 1);
    assert_eq!(sink.counter_value("stats.success"), 1);
    assert_eq!(sink.counter_value("hook.errors"), 0);
}

#[tokio::test]
async fn test_journey_follows_seed_codes() {
    let server = MockServer::start().await;
    mount_shortener(&server).await;

    let client = client_for(&server.uri());
    let processor = Processor::default();
    let sink = InMemorySink::new();
    let seeds = SeedPool::from_codes(vec!["seedAA".to_string(); SEED_POOL_SIZE]).unwrap();
    let mut session = SessionContext::with_seeds(seeds);

    Journey::new(&client, &processor, &sink)
        .run(&mut session)
        .await;

    assert_eq!(session.selected_short_code(), Some("seedAA"));
    assert!(session.random_short_code().is_none());

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().any(|r| r.url.path() == "/seedAA"));
}

#[tokio::test]
async fn test_unreachable_service_counts_transport_errors() {
    // nothing listens on port 1
    let client = client_for("http://127.0.0.1:1");
    let processor = Processor::default();
    let sink = InMemorySink::new();
    let mut session = SessionContext::new();

    let outcome = Journey::new(&client, &processor, &sink)
        .run(&mut session)
        .await;

    assert_eq!(outcome.requests_sent, 5);
    assert_eq!(outcome.transport_errors(), 5);
    assert_eq!(outcome.dedup, Some(DedupOutcome::MissingData));
    assert_eq!(sink.counter_value("http.transport_errors"), 5);
    assert_eq!(sink.counter_value("dedup.missing_data"), 1);
    assert_eq!(sink.counter_value("create.requests"), 0);
}

#[tokio::test]
async fn test_run_sessions_is_independent_per_session() {
    let server = MockServer::start().await;
    mount_shortener(&server).await;

    let client = client_for(&server.uri());
    let processor = Processor::default();
    let sink = InMemorySink::new();

    let outcomes = run_sessions(&client, &processor, &SeedPool::new(), &sink, 4).await;

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| o.transport_errors() == 0));
    assert_eq!(sink.counter_value("create.requests"), 12);
    assert_eq!(sink.counter_value("dedup.success"), 4);
    assert_eq!(sink.counter_value("redirect.requests"), 4);
    assert_eq!(sink.counter_value("stats.requests"), 4);
}
