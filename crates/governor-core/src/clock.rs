//! Time source used by every timing decision in the governor
//!
//! Production code runs on [`TokioClock`], which follows tokio's timer and
//! therefore also honours `tokio::time::pause()` in tests. [`ManualClock`]
//! never blocks: sleeping advances its virtual time and records the requested
//! duration, so backoff schedules measured in minutes can be asserted exactly.

use crate::error::{GovernorError, GovernorResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Source of the current time and of blocking waits
#[async_trait]
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current instant
    fn now(&self) -> Instant;

    /// Suspend the calling task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug)]
struct ManualState {
    now: Instant,
    sleeps: Vec<Duration>,
}

/// Virtual clock for tests
///
/// Clones share the same timeline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                now: Instant::now(),
                sleeps: Vec::new(),
            })),
        }
    }

    /// Move virtual time forward without recording a sleep
    pub fn advance(&self, duration: Duration) {
        self.state.lock().now += duration;
    }

    /// Every duration passed to `sleep`, in call order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().sleeps.clone()
    }

    /// Sum of all recorded sleeps
    pub fn total_slept(&self) -> Duration {
        self.state.lock().sleeps.iter().sum()
    }

    /// Forget recorded sleeps (virtual time is kept)
    pub fn clear_sleeps(&self) {
        self.state.lock().sleeps.clear();
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().now
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.now += duration;
        state.sleeps.push(duration);
    }
}

/// Sleep on `clock` unless `cancel` fires first.
///
/// Returns [`GovernorError::Cancelled`] if the token is already cancelled or
/// is cancelled before the sleep completes. A zero duration still observes the
/// token.
pub async fn sleep_cancellable(
    clock: &dyn Clock,
    duration: Duration,
    cancel: &CancellationToken,
) -> GovernorResult<()> {
    if cancel.is_cancelled() {
        return Err(GovernorError::Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GovernorError::Cancelled),
        _ = clock.sleep(duration) => Ok(()),
    }
}
