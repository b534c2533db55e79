//! The canonical virtual-user journey against the URL shortener
//!
//! One run walks a session through: create a URL, create the same URL again,
//! compare the two codes, create with a custom code, follow a seed code and
//! read stats for the last created code. Every response goes through the
//! processor's after-response pipeline. Transport failures are counted and
//! the journey moves on to its next step.

use crate::client::ProbeClient;
use futures::future::join_all;
use serde_json::{json, Value as JsonValue};
use squrl_load_core::metrics::names;
use squrl_load_core::{
    DedupOutcome, MetricsSink, Processor, RequestDescriptor, ResponseDescriptor, SeedPool,
    SessionContext,
};
use tracing::{info_span, warn, Instrument};

/// What one journey run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JourneyOutcome {
    pub requests_sent: usize,
    pub responses_received: usize,
    pub dedup: Option<DedupOutcome>,
}

impl JourneyOutcome {
    pub fn transport_errors(&self) -> usize {
        self.requests_sent - self.responses_received
    }
}

pub struct Journey<'a> {
    client: &'a ProbeClient,
    processor: &'a Processor,
    sink: &'a dyn MetricsSink,
}

impl<'a> Journey<'a> {
    pub fn new(
        client: &'a ProbeClient,
        processor: &'a Processor,
        sink: &'a dyn MetricsSink,
    ) -> Self {
        Self {
            client,
            processor,
            sink,
        }
    }

    pub async fn run(&self, session: &mut SessionContext) -> JourneyOutcome {
        let mut outcome = JourneyOutcome::default();

        self.processor.generate_test_data(session, self.sink);
        let test_url = session.test_url().unwrap_or_default().to_string();

        // same URL twice: the service must hand back the same code
        let body = json!({ "original_url": test_url });
        if let Some(code) = self.create(session, &body, &mut outcome).await {
            session.set_first_short_code(code);
        }
        if let Some(code) = self.create(session, &body, &mut outcome).await {
            session.set_second_short_code(code);
        }
        outcome.dedup = self.processor.check_deduplication(session, self.sink);

        self.processor.generate_test_url(session, self.sink);
        let custom_body = json!({
            "original_url": session.test_url().unwrap_or_default(),
            "custom_code": session.custom_code().map(|c| c.as_str()),
        });
        self.create(session, &custom_body, &mut outcome).await;

        if let Some(selection) = self.processor.select_seed_short_code(session, self.sink) {
            let url = self.client.url_for(selection.code());
            let request = self.request_for(session, RequestDescriptor::get(url));
            self.send(session, request, None, &mut outcome).await;
        }

        let stats_code = session
            .last_created_code()
            .or(session.selected_short_code())
            .map(str::to_string);
        if let Some(code) = stats_code {
            let url = self.client.url_for(&format!("/stats/{}", code));
            let request = self.request_for(session, RequestDescriptor::get(url));
            self.send(session, request, None, &mut outcome).await;
        }

        outcome
    }

    /// POST /create, returning the `short_code` from any JSON body that has one
    async fn create(
        &self,
        session: &mut SessionContext,
        body: &JsonValue,
        outcome: &mut JourneyOutcome,
    ) -> Option<String> {
        let url = self.client.url_for("/create");
        let request = self.request_for(session, RequestDescriptor::post(url));
        let response = self.send(session, request, Some(body), outcome).await?;

        serde_json::from_str::<JsonValue>(&response.body)
            .ok()?
            .get("short_code")?
            .as_str()
            .map(str::to_string)
    }

    async fn send(
        &self,
        session: &mut SessionContext,
        request: RequestDescriptor,
        body: Option<&JsonValue>,
        outcome: &mut JourneyOutcome,
    ) -> Option<ResponseDescriptor> {
        outcome.requests_sent += 1;

        match self.client.execute(&request, body).await {
            Ok(response) => {
                outcome.responses_received += 1;
                self.processor
                    .after_response(&request, &response, session, self.sink);
                Some(response)
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "Request failed before a response arrived");
                self.sink.increment(names::HTTP_TRANSPORT_ERRORS);
                None
            }
        }
    }

    fn request_for(
        &self,
        session: &SessionContext,
        request: RequestDescriptor,
    ) -> RequestDescriptor {
        match session.user_agent() {
            Some(user_agent) => request.with_header("user-agent", user_agent),
            None => request,
        }
    }
}

/// Run `sessions` independent journeys concurrently, each starting from its
/// own copy of the seed pool.
pub async fn run_sessions(
    client: &ProbeClient,
    processor: &Processor,
    seeds: &SeedPool,
    sink: &dyn MetricsSink,
    sessions: usize,
) -> Vec<JourneyOutcome> {
    let journey = Journey::new(client, processor, sink);
    let journey = &journey;

    let runs = (0..sessions).map(move |index| {
        let mut session = SessionContext::with_seeds(seeds.clone());
        async move { journey.run(&mut session).await }.instrument(info_span!("session", index))
    });

    join_all(runs).await
}
