//! Minimum-interval rate limiter with escalating quota cooldowns

use super::backoff::exponential_backoff;
use crate::clock::{Clock, sleep_cancellable};
use crate::config::{RateLimitConfig, RetryConfig};
use crate::error::GovernorResult;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Snapshot of the limiter's internal state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterState {
    /// Spacing derived from the requests-per-minute ceiling
    pub min_interval: Duration,
    /// When the last outbound call was released
    pub last_request: Option<Instant>,
    /// Quota errors since the last success
    pub consecutive_failures: u32,
    pub max_retries: u32,
}

/// Rate limiter owned by a single governed client
///
/// Not shareable on purpose: the wait-then-stamp sequence in
/// [`RateLimiter::wait_if_needed`] must not interleave with another caller's,
/// so the owner serializes access.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    max_jitter: Duration,
    base_backoff: Duration,
    max_retries: u32,
    last_request: Option<Instant>,
    consecutive_failures: u32,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(rate_limit: &RateLimitConfig, retry: &RetryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_interval: rate_limit.min_interval(),
            max_jitter: rate_limit.max_jitter,
            base_backoff: retry.base_backoff,
            max_retries: retry.max_retries,
            last_request: None,
            consecutive_failures: 0,
            clock,
        }
    }

    /// Block until the minimum interval since the previous call has elapsed.
    ///
    /// When a wait is needed a random jitter in `[0, max_jitter)` is added to
    /// it. The call timestamp is updated before returning. Returns how long the
    /// caller was held back. On cancellation the timestamp is left untouched.
    pub async fn wait_if_needed(&mut self, cancel: &CancellationToken) -> GovernorResult<Duration> {
        let mut waited = Duration::ZERO;

        if let Some(last) = self.last_request {
            let since_last = self.clock.now().saturating_duration_since(last);
            if since_last < self.min_interval {
                waited = self.min_interval - since_last + self.jitter();
                debug!(
                    wait_secs = waited.as_secs_f64(),
                    min_interval_secs = self.min_interval.as_secs_f64(),
                    "throttling outbound request"
                );
                sleep_cancellable(self.clock.as_ref(), waited, cancel).await?;
            }
        }

        self.last_request = Some(self.clock.now());
        Ok(waited)
    }

    /// Record a quota rejection and sit out the cooldown.
    ///
    /// The cooldown is `base_backoff * 2^(failures - 1)` where `failures`
    /// includes this error. Returns the cooldown that was applied.
    pub async fn on_quota_error(&mut self, cancel: &CancellationToken) -> GovernorResult<Duration> {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let cooldown = self.current_backoff();

        warn!(
            consecutive_failures = self.consecutive_failures,
            cooldown_secs = cooldown.as_secs_f64(),
            "quota exceeded, backing off"
        );

        sleep_cancellable(self.clock.as_ref(), cooldown, cancel).await?;
        Ok(cooldown)
    }

    /// Clear the failure streak after a successful call
    pub fn on_success(&mut self) {
        if self.consecutive_failures > 0 {
            debug!(
                previous_failures = self.consecutive_failures,
                "failure streak cleared"
            );
        }
        self.consecutive_failures = 0;
    }

    /// Cooldown matching the current failure streak
    pub fn current_backoff(&self) -> Duration {
        exponential_backoff(self.base_backoff, self.consecutive_failures)
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn state(&self) -> RateLimiterState {
        RateLimiterState {
            min_interval: self.min_interval,
            last_request: self.last_request,
            consecutive_failures: self.consecutive_failures,
            max_retries: self.max_retries,
        }
    }

    fn jitter(&self) -> Duration {
        if self.max_jitter.is_zero() {
            return Duration::ZERO;
        }
        rand::thread_rng().gen_range(Duration::ZERO..self.max_jitter)
    }
}
