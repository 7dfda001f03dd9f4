//! Retry policy for upstream calls.

use std::time::Duration;

use crate::error::TranslateError;

/// Fixed-delay retry policy.
///
/// Only 429 and 5xx answers are retried. Transport errors and other
/// statuses are returned to the caller on the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay between attempts.
    pub delay: Duration,
    /// Upper bound for a `Retry-After` hint from the upstream.
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            delay: Duration::from_secs(1),
            max_retry_after: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given retry count and delay.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            ..Self::default()
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Returns true if `attempt` (0-based) failed with `err` and another attempt is allowed.
    pub fn should_retry(&self, attempt: u32, err: &TranslateError) -> bool {
        attempt < self.max_retries && err.is_retryable()
    }

    /// Delay before the next attempt.
    ///
    /// A `Retry-After` hint can only lengthen the fixed delay, never beyond
    /// `max_retry_after`.
    pub fn delay_for(&self, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) => self.delay.max(hint.min(self.max_retry_after)),
            None => self.delay,
        }
    }
}

/// Parses a `Retry-After` header given in seconds.
///
/// HTTP-date values are ignored; DeepL only sends seconds.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
