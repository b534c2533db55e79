//! Latency banding against fixed thresholds

use crate::metrics::{names, MetricsSink};
use crate::types::ResponseDescriptor;
use std::time::Duration;

pub const FAST_RESPONSE: Duration = Duration::from_millis(100);
pub const SLOW_RESPONSE: Duration = Duration::from_millis(1000);
pub const VERY_SLOW_RESPONSE: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LatencyBand {
    Fast,
    Normal,
    Slow,
    VerySlow,
}

impl LatencyBand {
    /// Bounds are exclusive: exactly 100ms is not fast, exactly 1000ms is not slow
    pub fn of(elapsed: Duration) -> Self {
        if elapsed > VERY_SLOW_RESPONSE {
            LatencyBand::VerySlow
        } else if elapsed > SLOW_RESPONSE {
            LatencyBand::Slow
        } else if elapsed < FAST_RESPONSE {
            LatencyBand::Fast
        } else {
            LatencyBand::Normal
        }
    }
}

/// Very slow responses emit both the slow and the very-slow counter.
pub fn bucket(response: &ResponseDescriptor, sink: &dyn MetricsSink) -> LatencyBand {
    let band = LatencyBand::of(response.elapsed);

    match band {
        LatencyBand::VerySlow => {
            sink.increment(names::PERFORMANCE_SLOW);
            sink.increment(names::PERFORMANCE_VERY_SLOW);
        }
        LatencyBand::Slow => sink.increment(names::PERFORMANCE_SLOW),
        LatencyBand::Fast => sink.increment(names::PERFORMANCE_FAST),
        LatencyBand::Normal => {}
    }

    band
}
