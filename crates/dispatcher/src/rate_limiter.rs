//! RateLimiter - minimum interval between successful sends

use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Tracks the last successful send and computes the wait before the next one
///
/// Owned by the dispatch worker; never shared.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_send: Option<Instant>,
}

impl RateLimiter {
    /// Limiter with no send recorded yet
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_send: None,
        }
    }

    /// Limiter continuing from a previous worker generation
    pub fn resume(min_interval: Duration, last_send: Option<Instant>) -> Self {
        Self {
            min_interval,
            last_send,
        }
    }

    /// Wait required at `now` before the next send may start
    pub fn required_wait(&self, now: Instant) -> Duration {
        match self.last_send {
            None => Duration::ZERO,
            Some(last) => self
                .min_interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }

    /// Suspend until the interval since the last send has elapsed
    ///
    /// Returns how long it waited.
    pub async fn wait_if_needed(&self) -> Duration {
        let wait = self.required_wait(Instant::now());
        if !wait.is_zero() {
            sleep(wait).await;
        }
        wait
    }

    /// Record a successful send
    pub fn record_send(&mut self, at: Instant) {
        self.last_send = Some(at);
    }

    /// Time of the last successful send
    pub fn last_send(&self) -> Option<Instant> {
        self.last_send
    }

    /// Configured interval
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_send_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        assert_eq!(limiter.required_wait(Instant::now()), Duration::ZERO);
        assert_eq!(limiter.wait_if_needed().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_remaining_interval() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();
        limiter.record_send(start);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(limiter.required_wait(Instant::now()), Duration::from_secs(3));

        let waited = limiter.wait_if_needed().await;
        assert_eq!(waited, Duration::from_secs(3));
        assert!(Instant::now() - start >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        limiter.record_send(Instant::now());
        tokio::time::advance(Duration::from_secs(7)).await;
        assert_eq!(limiter.required_wait(Instant::now()), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_keeps_previous_send() {
        let last = Instant::now();
        let limiter = RateLimiter::resume(Duration::from_secs(5), Some(last));
        assert_eq!(limiter.last_send(), Some(last));
        assert_eq!(limiter.required_wait(last), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_never_waits() {
        let mut limiter = RateLimiter::new(Duration::ZERO);
        limiter.record_send(Instant::now());
        assert_eq!(limiter.wait_if_needed().await, Duration::ZERO);
    }
}
