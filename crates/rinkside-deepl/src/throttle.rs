//! Outgoing request throttling.

use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

/// Token-bucket throttle applied before every upstream attempt.
///
/// Callers wait for a permit instead of being rejected, so bursts from
/// the front-end are smoothed rather than failed.
pub struct Throttle {
    limiter: DefaultDirectRateLimiter,
    per_second: NonZeroU32,
}

impl Throttle {
    /// Creates a throttle allowing `per_second` requests per second.
    pub fn per_second(per_second: NonZeroU32) -> Self {
        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
            per_second,
        }
    }

    /// Waits until a request may be sent.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    /// Returns the configured rate.
    pub fn rate(&self) -> u32 {
        self.per_second.get()
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("per_second", &self.per_second)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_burst_within_quota_is_immediate() {
        let throttle = Throttle::per_second(NonZeroU32::new(10).unwrap());
        let start = Instant::now();

        for _ in 0..5 {
            throttle.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_exceeding_quota_waits() {
        let throttle = Throttle::per_second(NonZeroU32::new(2).unwrap());
        let start = Instant::now();

        // Burst of 2, third permit is released ~500ms later
        for _ in 0..3 {
            throttle.acquire().await;
        }

        assert!(start.elapsed() >= Duration::from_millis(300));
        assert_eq!(throttle.rate(), 2);
    }
}
