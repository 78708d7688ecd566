// SPDX-License-Identifier: MIT
//! Structured logging helpers for request handling.

use std::time::Instant;
use tracing::{debug, info};

/// Operations slower than this are logged at info level.
const SLOW_THRESHOLD_MS: u128 = 1000;

/// Track latency of an operation and emit a structured log event.
pub struct LatencyTracker {
    operation: String,
    start: Instant,
}

impl LatencyTracker {
    /// Start tracking latency for an operation.
    ///
    /// Examples:
    ///   let tracker = LatencyTracker::start("maintenance.plan");
    pub fn start(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            start: Instant::now(),
        }
    }

    /// Finish tracking and emit a log event with the elapsed time.
    pub fn finish(self) {
        let elapsed_ms = self.start.elapsed().as_millis();
        if elapsed_ms > SLOW_THRESHOLD_MS {
            info!(
                operation = %self.operation,
                elapsed_ms = elapsed_ms as u64,
                "slow operation"
            );
        } else {
            debug!(
                operation = %self.operation,
                elapsed_ms = elapsed_ms as u64,
                "operation complete"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_finishes_without_panicking() {
        let tracker = LatencyTracker::start("test.op");
        tracker.finish();
    }
}
