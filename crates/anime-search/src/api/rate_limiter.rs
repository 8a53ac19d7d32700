//! Client-side rate limiter for the public search APIs.
//!
//! Enforces both per-second and per-minute limits before each request.

use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Rate limiter with dual constraints (per-second and per-minute)
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between two requests, `None` when unlimited
    min_interval: Option<Duration>,
    /// Maximum requests per minute
    max_per_minute: u32,
    /// Last request timestamp
    last_request: Option<Instant>,
    /// Request timestamps in the last minute
    recent_requests: Vec<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// A non-positive `max_per_second` or a zero `max_per_minute` disables
    /// that constraint.
    pub fn new(max_per_second: f64, max_per_minute: u32) -> Self {
        let min_interval = (max_per_second > 0.0 && max_per_second.is_finite())
            .then(|| Duration::try_from_secs_f64(1.0 / max_per_second).ok())
            .flatten();

        Self {
            min_interval,
            max_per_minute,
            last_request: None,
            recent_requests: Vec::with_capacity(max_per_minute as usize),
        }
    }

    /// Wait until a request can be made, respecting both rate limits
    pub async fn acquire(&mut self) {
        let now = Instant::now();
        let window = Duration::from_secs(60);

        self.recent_requests
            .retain(|&timestamp| now.duration_since(timestamp) < window);

        if self.max_per_minute > 0 && self.recent_requests.len() >= self.max_per_minute as usize {
            // Wait until the oldest request leaves the window
            if let Some(&oldest) = self.recent_requests.first() {
                let elapsed = now.duration_since(oldest);
                if elapsed < window {
                    let wait_time = window - elapsed;
                    tracing::debug!(
                        wait_ms = wait_time.as_millis(),
                        "Rate limit: waiting for per-minute limit"
                    );
                    sleep(wait_time).await;
                }
            }
        }

        if let (Some(last), Some(min_interval)) = (self.last_request, self.min_interval) {
            let elapsed = Instant::now().duration_since(last);
            if elapsed < min_interval {
                let wait_time = min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis(),
                    "Rate limit: waiting for per-second limit"
                );
                sleep(wait_time).await;
            }
        }

        let request_time = Instant::now();
        self.last_request = Some(request_time);
        self.recent_requests.push(request_time);
    }

    /// Get the current number of requests in the last minute
    pub fn current_minute_count(&mut self) -> usize {
        let now = Instant::now();
        self.recent_requests
            .retain(|&timestamp| now.duration_since(timestamp) < Duration::from_secs(60));
        self.recent_requests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_per_second() {
        let mut limiter = RateLimiter::new(4.0, 50);

        let start = Instant::now();

        // Three requests need two full intervals of 250ms
        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() >= Duration::from_millis(450));
        assert_eq!(limiter.current_minute_count(), 3);
    }

    #[tokio::test]
    async fn test_unlimited_does_not_wait() {
        let mut limiter = RateLimiter::new(0.0, 0);

        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_per_minute() {
        let mut limiter = RateLimiter::new(100.0, 3); // High per-second, low per-minute

        let start = Instant::now();

        // Fourth request waits for the first to leave the window
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_secs(1));

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(60));
        assert_eq!(limiter.current_minute_count(), 3);
    }

    #[test]
    fn test_tiny_rate_is_unlimited_per_second() {
        let limiter = RateLimiter::new(f64::MIN_POSITIVE, 0);
        assert_eq!(limiter.min_interval, None);

        let limiter = RateLimiter::new(0.5, 0);
        assert_eq!(limiter.min_interval, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_current_minute_count() {
        let mut limiter = RateLimiter::new(2.0, 50);
        assert_eq!(limiter.current_minute_count(), 0);
    }
}
