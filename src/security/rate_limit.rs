//! Per-client rate limiting middleware.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::security::clock::{Clock, SystemClock};

/// A simple token bucket with continuous refill.
///
/// Invariant: `tokens` stays within `[0, burst]`; fractional tokens are fine
/// internally, each admission consumes exactly 1.0.
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_refill: now,
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64, now: Instant) -> bool {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-client admission limiter.
///
/// Buckets are created lazily on first sight of a client identifier. The
/// lookup-or-create and refill/consume steps share one critical section, so
/// concurrent requests for the same fresh identifier can never race a
/// duplicate bucket into the registry.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    rate_per_second: f64,
    burst_capacity: f64,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a limiter reading monotonic wall time.
    pub fn new(rate_per_second: f64, burst_capacity: f64) -> Self {
        Self::with_clock(rate_per_second, burst_capacity, Arc::new(SystemClock))
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.requests_per_second, config.burst_size)
    }

    /// Create a limiter with an injected clock.
    pub fn with_clock(rate_per_second: f64, burst_capacity: f64, clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            rate_per_second,
            burst_capacity,
            clock,
        }
    }

    /// Decide whether a request from `client_id` may proceed.
    ///
    /// Never blocks on I/O and never fails; `false` is the normal signal for
    /// "over limit".
    pub fn admit(&self, client_id: &str) -> bool {
        let now = self.clock.now();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let bucket = buckets
            .entry(client_id.to_string())
            .or_insert_with(|| TokenBucket::new(self.burst_capacity, now));

        bucket.try_acquire(self.burst_capacity, self.rate_per_second, now)
    }

    /// Drop buckets that have not seen a request for at least `max_idle`.
    /// Returns the number of buckets evicted.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let now = self.clock.now();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let before = buckets.len();
        buckets.retain(|_, bucket| now.duration_since(bucket.last_refill) < max_idle);
        before - buckets.len()
    }

    /// Number of tracked client identifiers.
    pub fn bucket_count(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Middleware applying the admission decision ahead of routing.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = addr.ip().to_string();

    if limiter.admit(&client) {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "rate limit exceeded");
        metrics::record_rate_limited();
        ApiError::TooManyRequests.into_response()
    }
}

/// Spawn the background task that evicts idle buckets.
///
/// Without this the registry grows without bound under rotating client
/// addresses; buckets idle longer than `max_idle` are reaped every
/// `interval`. Stops when the shutdown signal fires.
pub fn spawn_sweeper(
    limiter: Arc<RateLimiter>,
    interval: Duration,
    max_idle: Duration,
    mut shutdown: ShutdownSignal,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let evicted = limiter.sweep_idle(max_idle);
                    if evicted > 0 {
                        tracing::debug!(evicted, "evicted idle rate limit buckets");
                    }
                }
                _ = shutdown.wait() => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::clock::ManualClock;

    fn limiter_with_clock(rate: f64, burst: f64) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(rate, burst, clock.clone());
        (limiter, clock)
    }

    #[test]
    fn burst_then_reject() {
        let (limiter, _clock) = limiter_with_clock(1.0, 3.0);

        assert!(limiter.admit("10.0.0.1"));
        assert!(limiter.admit("10.0.0.1"));
        assert!(limiter.admit("10.0.0.1"));
        assert!(!limiter.admit("10.0.0.1"));
    }

    #[test]
    fn refill_grants_exactly_one_token() {
        let (limiter, clock) = limiter_with_clock(1.0, 3.0);

        for _ in 0..3 {
            assert!(limiter.admit("10.0.0.1"));
        }
        assert!(!limiter.admit("10.0.0.1"));

        clock.advance(Duration::from_secs(1));
        assert!(limiter.admit("10.0.0.1"));
        assert!(!limiter.admit("10.0.0.1"));
    }

    #[test]
    fn clients_do_not_interfere() {
        let (limiter, _clock) = limiter_with_clock(1.0, 2.0);

        assert!(limiter.admit("10.0.0.1"));
        assert!(limiter.admit("10.0.0.1"));
        assert!(!limiter.admit("10.0.0.1"));

        assert!(limiter.admit("10.0.0.2"));
        assert!(limiter.admit("10.0.0.2"));
    }

    #[test]
    fn tokens_cap_at_burst_after_long_idle() {
        let (limiter, clock) = limiter_with_clock(1.0, 3.0);

        assert!(limiter.admit("10.0.0.1"));
        clock.advance(Duration::from_secs(3600));

        for _ in 0..3 {
            assert!(limiter.admit("10.0.0.1"));
        }
        assert!(!limiter.admit("10.0.0.1"));
    }

    #[test]
    fn reference_scenario() {
        // rate = 1/s, burst = 3: t=0,0,0,0 then t=1.0 twice.
        let (limiter, clock) = limiter_with_clock(1.0, 3.0);

        let results: Vec<bool> = (0..4).map(|_| limiter.admit("client")).collect();
        assert_eq!(results, vec![true, true, true, false]);

        clock.advance(Duration::from_secs(1));
        assert!(limiter.admit("client"));
        assert!(!limiter.admit("client"));
    }

    #[test]
    fn sweep_evicts_only_idle_buckets() {
        let (limiter, clock) = limiter_with_clock(1.0, 3.0);

        assert!(limiter.admit("old"));
        clock.advance(Duration::from_secs(400));
        assert!(limiter.admit("fresh"));
        assert_eq!(limiter.bucket_count(), 2);

        let evicted = limiter.sweep_idle(Duration::from_secs(300));
        assert_eq!(evicted, 1);
        assert_eq!(limiter.bucket_count(), 1);

        // The surviving client still has its bucket state.
        assert!(limiter.admit("fresh"));
    }

    #[test]
    fn fractional_refill_is_not_enough_for_admission() {
        let (limiter, clock) = limiter_with_clock(1.0, 1.0);

        assert!(limiter.admit("client"));
        clock.advance(Duration::from_millis(500));
        assert!(!limiter.admit("client"));
        clock.advance(Duration::from_millis(500));
        assert!(limiter.admit("client"));
    }
}
