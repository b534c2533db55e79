//! Deduplication check: the same submitted URL must yield the same code

use crate::metrics::{names, MetricsSink};
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    Success,
    Failure,
    MissingData,
}

impl DedupOutcome {
    pub fn metric_name(&self) -> &'static str {
        match self {
            DedupOutcome::Success => names::DEDUP_SUCCESS,
            DedupOutcome::Failure => names::DEDUP_FAILURE,
            DedupOutcome::MissingData => names::DEDUP_MISSING_DATA,
        }
    }
}

/// Compare `firstShortCode` with `secondShortCode` and emit the outcome
pub fn verify_dedup(session: &SessionContext, sink: &dyn MetricsSink) -> DedupOutcome {
    let outcome = match (session.first_short_code(), session.second_short_code()) {
        (Some(first), Some(second)) if first == second => DedupOutcome::Success,
        (Some(first), Some(second)) => {
            tracing::warn!(first, second, "Identical URLs produced different short codes");
            DedupOutcome::Failure
        }
        _ => DedupOutcome::MissingData,
    };

    sink.increment(outcome.metric_name());
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InMemorySink;

    fn session(first: Option<&str>, second: Option<&str>) -> SessionContext {
        let mut session = SessionContext::new();
        if let Some(first) = first {
            session.set_first_short_code(first);
        }
        if let Some(second) = second {
            session.set_second_short_code(second);
        }
        session
    }

    #[test]
    fn test_matching_codes() {
        let sink = InMemorySink::new();
        let outcome = verify_dedup(&session(Some("ABC123"), Some("ABC123")), &sink);
        assert_eq!(outcome, DedupOutcome::Success);
        assert_eq!(sink.counter_value("dedup.success"), 1);
        assert_eq!(sink.counter_names(), vec!["dedup.success"]);
    }

    #[test]
    fn test_differing_codes() {
        let sink = InMemorySink::new();
        let outcome = verify_dedup(&session(Some("ABC123"), Some("XYZ789")), &sink);
        assert_eq!(outcome, DedupOutcome::Failure);
        assert_eq!(sink.counter_value("dedup.failure"), 1);
        assert_eq!(sink.counter_value("dedup.success"), 0);
    }

    #[test]
    fn test_missing_codes() {
        let sink = InMemorySink::new();
        assert_eq!(
            verify_dedup(&session(None, Some("ABC123")), &sink),
            DedupOutcome::MissingData
        );
        assert_eq!(
            verify_dedup(&session(Some("ABC123"), None), &sink),
            DedupOutcome::MissingData
        );
        assert_eq!(verify_dedup(&session(None, None), &sink), DedupOutcome::MissingData);
        assert_eq!(sink.counter_value("dedup.missing_data"), 3);
    }
}
