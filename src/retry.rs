// SPDX-License-Identifier: MIT
//! Exponential backoff for external calls.
//!
//! [`RetryPolicy::run`] retries a fallible async operation with doubling
//! delays between attempts, capped at `max_delay`. Used by the vehicle-data
//! proxy; the planner core never needs it (it cannot fail).

use std::time::Duration;
use tracing::{debug, warn};

/// Retry schedule: `max_attempts` tries total, delay doubling from
/// `initial_delay` up to `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Build a policy from config-file fields.
    pub fn new(max_attempts: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// A policy suitable for unit tests (no real waiting).
    pub fn instant() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        }
    }

    /// Run `op` up to `max_attempts` times, sleeping between failures.
    ///
    /// Returns the first success, or the last error once attempts are
    /// exhausted.
    pub async fn run<F, Fut, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut delay = self.initial_delay;
        let attempts = self.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "retry succeeded");
                    }
                    return Ok(value);
                }
                Err(e) if attempt < attempts => {
                    warn!(
                        attempt,
                        max = attempts,
                        delay_ms = delay.as_millis() as u64,
                        err = %e,
                        "attempt failed — retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.max_delay);
                    attempt += 1;
                }
                Err(e) => {
                    warn!(attempt, max = attempts, err = %e, "all retry attempts exhausted");
                    return Err(e);
                }
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn succeeds_on_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<u32, String> = RetryPolicy::instant()
            .run(|| {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::Relaxed);
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<u32, String> = RetryPolicy::instant()
            .run(|| {
                let c = c.clone();
                async move {
                    let n = c.fetch_add(1, Ordering::Relaxed) + 1;
                    if n < 3 {
                        Err(format!("attempt {n} failed"))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn returns_last_error_when_exhausted() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<u32, String> = RetryPolicy::instant()
            .run(|| {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::Relaxed);
                    Err("permanent error".to_string())
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "permanent error");
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let result: Result<(), String> = RetryPolicy::new(0, 1, 10)
            .run(|| async { Err("fail".to_string()) })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn delay_is_capped_at_max() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        };

        let start = std::time::Instant::now();
        let _: Result<(), String> = policy.run(|| async { Err("fail".to_string()) }).await;

        // 10 attempts with at most 5ms between each; allow headroom for CI.
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
