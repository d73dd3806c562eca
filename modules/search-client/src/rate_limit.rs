use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum delay between outgoing search requests, shared across
/// web and image search so a single run cannot hammer a provider.
pub struct RateLimiter {
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the minimum delay since the previous request has elapsed,
    /// plus a small random jitter to avoid lockstep retries.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_delay {
                let sleep_for = self.min_delay - elapsed
                    + Duration::from_millis(rand::rng().random_range(0..100));
                debug!(sleep_ms = sleep_for.as_millis() as u64, "Rate limiting search request");
                tokio::time::sleep(sleep_for).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn second_request_waits_for_min_delay() {
        let limiter = RateLimiter::new(Duration::from_secs(1));

        limiter.wait().await;
        let before = Instant::now();
        limiter.wait().await;
        let waited = before.elapsed();

        assert!(waited >= Duration::from_secs(1), "waited only {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn first_request_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let before = Instant::now();
        limiter.wait().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
