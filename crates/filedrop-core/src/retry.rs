//! Exponential backoff policy for storage writes.

use std::time::Duration;

use crate::constants::{
    RETRY_BACKOFF_FACTOR, RETRY_INITIAL_DELAY_MS, RETRY_MAX_DELAY_MS, RETRY_MAX_PERIOD_MS,
};

/// Parameters governing the retry loop around a storage write attempt
/// sequence. The whole open/write/close sequence is retried as a unit until
/// `max_retry_period` has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after every failed attempt.
    pub backoff_factor: f64,
    /// Upper bound for a single inter-attempt delay.
    pub max_delay: Duration,
    /// Total retry budget. No new attempt starts after this much time.
    pub max_retry_period: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            initial_delay: Duration::from_millis(RETRY_INITIAL_DELAY_MS),
            backoff_factor: RETRY_BACKOFF_FACTOR,
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
            max_retry_period: Duration::from_millis(RETRY_MAX_PERIOD_MS),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries. Useful in tests and for callers that want
    /// a single attempt.
    pub fn no_retry() -> Self {
        RetryPolicy {
            initial_delay: Duration::ZERO,
            backoff_factor: 1.0,
            max_delay: Duration::ZERO,
            max_retry_period: Duration::ZERO,
        }
    }

    /// The delay following `current`, capped at `max_delay`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        let scaled = current.mul_f64(self.backoff_factor.max(1.0));
        scaled.min(self.max_delay)
    }
}
