//! Engine-facing hooks
//!
//! The load engine calls these once per scenario step. Every hook returns
//! normally: a returned call is the completion signal, and nothing raised
//! inside a hook (error or panic) reaches the engine. Such failures become
//! the `hook.errors` counter instead.

use crate::classifier::{Endpoint, OutcomeClassifier};
use crate::dedup::{verify_dedup, DedupOutcome};
use crate::error::{ProbeError, Result};
use crate::identifier::{Identifier, CUSTOM_CODE_LEN, SHORT_CODE_LEN};
use crate::inputs::{make_test_url, make_user_agent};
use crate::metrics::{names, MetricsSink};
use crate::performance::{self, LatencyBand};
use crate::seed::{select_seed, SeedSelection};
use crate::session::SessionContext;
use crate::types::{RequestDescriptor, ResponseDescriptor};
use crate::validator::{
    validate_create_response, validate_redirect_response, CreateValidation, RedirectValidation,
};
use squrl_load_config::ProbeConfig;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

#[derive(Debug, Clone, Default)]
pub struct Processor {
    classifier: OutcomeClassifier,
}

impl Processor {
    pub fn new(classifier: OutcomeClassifier) -> Self {
        Self { classifier }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(OutcomeClassifier::from_config(config))
    }

    pub fn classifier(&self) -> &OutcomeClassifier {
        &self.classifier
    }

    // -- request-side generators --

    /// 8-character `customCode`
    pub fn generate_custom_code(&self, session: &mut SessionContext, sink: &dyn MetricsSink) {
        guarded(sink, "generate_custom_code", || {
            let code = Identifier::custom_code().validated(CUSTOM_CODE_LEN)?;
            session.set_custom_code(code);
            Ok(())
        });
    }

    /// 6-character `randomShortCode`
    pub fn generate_random_short_code(&self, session: &mut SessionContext, sink: &dyn MetricsSink) {
        guarded(sink, "generate_random_short_code", || {
            let code = Identifier::short_code().validated(SHORT_CODE_LEN)?;
            session.set_random_short_code(code);
            Ok(())
        });
    }

    pub fn generate_test_url(&self, session: &mut SessionContext, sink: &dyn MetricsSink) {
        guarded(sink, "generate_test_url", || {
            session.set_test_url(make_test_url());
            Ok(())
        });
    }

    pub fn generate_user_agent(&self, session: &mut SessionContext, sink: &dyn MetricsSink) {
        guarded(sink, "generate_user_agent", || {
            session.set_user_agent(make_user_agent());
            Ok(())
        });
    }

    /// Custom code, target URL and user agent in one step
    pub fn generate_test_data(&self, session: &mut SessionContext, sink: &dyn MetricsSink) {
        self.generate_custom_code(session, sink);
        self.generate_test_url(session, sink);
        self.generate_user_agent(session, sink);
    }

    pub fn select_seed_short_code(
        &self,
        session: &mut SessionContext,
        sink: &dyn MetricsSink,
    ) -> Option<SeedSelection> {
        guarded(sink, "select_seed_short_code", || Ok(select_seed(session)))
    }

    pub fn check_deduplication(
        &self,
        session: &SessionContext,
        sink: &dyn MetricsSink,
    ) -> Option<DedupOutcome> {
        guarded(sink, "check_deduplication", || Ok(verify_dedup(session, sink)))
    }

    // -- response-side hooks --

    pub fn track_metrics(
        &self,
        request: &RequestDescriptor,
        response: &ResponseDescriptor,
        sink: &dyn MetricsSink,
    ) -> Option<Endpoint> {
        guarded(sink, "track_metrics", || {
            Ok(self.classifier.classify(request, response, sink))
        })
        .flatten()
    }

    pub fn validate_create_response(
        &self,
        response: &ResponseDescriptor,
        session: &mut SessionContext,
        sink: &dyn MetricsSink,
    ) -> Option<CreateValidation> {
        guarded(sink, "validate_create_response", || {
            Ok(validate_create_response(response, session, sink))
        })
    }

    pub fn validate_redirect_response(
        &self,
        response: &ResponseDescriptor,
        sink: &dyn MetricsSink,
    ) -> Option<RedirectValidation> {
        guarded(sink, "validate_redirect_response", || {
            Ok(validate_redirect_response(response, sink))
        })
    }

    pub fn log_performance(
        &self,
        response: &ResponseDescriptor,
        sink: &dyn MetricsSink,
    ) -> Option<LatencyBand> {
        guarded(sink, "log_performance", || Ok(performance::bucket(response, sink)))
    }

    /// Full after-response pipeline: classify, run the validator matching the
    /// request's endpoint, then band the latency. Each stage runs even when an
    /// earlier one failed; the return value is the classifier's result.
    pub fn after_response(
        &self,
        request: &RequestDescriptor,
        response: &ResponseDescriptor,
        session: &mut SessionContext,
        sink: &dyn MetricsSink,
    ) -> Option<Endpoint> {
        let endpoint = self.track_metrics(request, response, sink);

        match Endpoint::detect(request) {
            Some(Endpoint::Create) => {
                self.validate_create_response(response, session, sink);
            }
            Some(Endpoint::Redirect) => {
                self.validate_redirect_response(response, sink);
            }
            Some(Endpoint::Stats) | None => {}
        }

        self.log_performance(response, sink);
        endpoint
    }
}

/// Run one hook body, turning an `Err` or a panic into `hook.errors`.
fn guarded<T>(
    sink: &dyn MetricsSink,
    hook: &'static str,
    body: impl FnOnce() -> Result<T>,
) -> Option<T> {
    let failure = match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => return Some(value),
        Ok(Err(e)) => e,
        Err(payload) => ProbeError::HookPanicked {
            hook,
            message: panic_message(payload.as_ref()),
        },
    };

    error!(hook, error = %failure, "Hook failed, continuing scenario");
    sink.increment(names::HOOK_ERRORS);
    None
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
