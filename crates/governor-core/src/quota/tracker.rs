//! Quota tracker

use crate::clock::Clock;
use crate::config::QuotaConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Length of the hourly window
pub const HOUR: Duration = Duration::from_secs(3600);
/// Length of the daily window
pub const DAY: Duration = Duration::from_secs(86_400);

/// Raw counters and the start of their windows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaCounters {
    pub hourly_count: u32,
    pub daily_count: u32,
    pub window_start_hour: Instant,
    pub window_start_day: Instant,
}

impl QuotaCounters {
    fn new(now: Instant) -> Self {
        Self {
            hourly_count: 0,
            daily_count: 0,
            window_start_hour: now,
            window_start_day: now,
        }
    }

    /// Counters as they would look after rolling expired windows forward to `now`
    fn rolled(&self, now: Instant) -> Self {
        let mut next = self.clone();
        if now.saturating_duration_since(self.window_start_hour) >= HOUR {
            next.hourly_count = 0;
            next.window_start_hour = now;
        }
        if now.saturating_duration_since(self.window_start_day) >= DAY {
            next.daily_count = 0;
            next.window_start_day = now;
        }
        next
    }
}

/// Read-only view of the quota at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub requests_this_hour: u32,
    pub requests_today: u32,
    pub hourly_remaining: u32,
    pub daily_remaining: u32,
    pub can_proceed: bool,
    /// Time left in the current hourly window
    #[serde(with = "humantime_serde")]
    pub hourly_resets_in: Duration,
    /// Time left in the current daily window
    #[serde(with = "humantime_serde")]
    pub daily_resets_in: Duration,
}

/// Tracks requests sent against hourly and daily ceilings
#[derive(Debug)]
pub struct QuotaTracker {
    hourly_ceiling: u32,
    daily_ceiling: u32,
    counters: QuotaCounters,
    total_recorded: u64,
    clock: Arc<dyn Clock>,
}

impl QuotaTracker {
    pub fn new(config: &QuotaConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            hourly_ceiling: config.requests_per_hour,
            daily_ceiling: config.requests_per_day,
            counters: QuotaCounters::new(clock.now()),
            total_recorded: 0,
            clock,
        }
    }

    /// Roll expired windows forward, then report whether both ceilings allow
    /// another request.
    pub fn can_proceed(&mut self) -> bool {
        self.roll_over();
        self.counters.hourly_count < self.hourly_ceiling
            && self.counters.daily_count < self.daily_ceiling
    }

    /// Count one request that was actually sent.
    ///
    /// Cache hits must not be recorded.
    pub fn record_request(&mut self) {
        self.roll_over();
        self.counters.hourly_count = self.counters.hourly_count.saturating_add(1);
        self.counters.daily_count = self.counters.daily_count.saturating_add(1);
        self.total_recorded += 1;
    }

    /// Snapshot of the quota as of now; does not modify the tracker
    pub fn status(&self) -> QuotaStatus {
        let now = self.clock.now();
        let view = self.counters.rolled(now);

        QuotaStatus {
            requests_this_hour: view.hourly_count,
            requests_today: view.daily_count,
            hourly_remaining: self.hourly_ceiling.saturating_sub(view.hourly_count),
            daily_remaining: self.daily_ceiling.saturating_sub(view.daily_count),
            can_proceed: view.hourly_count < self.hourly_ceiling
                && view.daily_count < self.daily_ceiling,
            hourly_resets_in: HOUR
                .saturating_sub(now.saturating_duration_since(view.window_start_hour)),
            daily_resets_in: DAY
                .saturating_sub(now.saturating_duration_since(view.window_start_day)),
        }
    }

    /// Requests recorded since the tracker was created, across all windows
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    pub fn counters(&self) -> &QuotaCounters {
        &self.counters
    }

    fn roll_over(&mut self) {
        let now = self.clock.now();
        let rolled = self.counters.rolled(now);
        if rolled.hourly_count != self.counters.hourly_count {
            debug!(previous = self.counters.hourly_count, "hourly quota window rolled over");
        }
        if rolled.daily_count != self.counters.daily_count {
            debug!(previous = self.counters.daily_count, "daily quota window rolled over");
        }
        self.counters = rolled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn tracker(hourly: u32, daily: u32, clock: &ManualClock) -> QuotaTracker {
        QuotaTracker::new(
            &QuotaConfig {
                requests_per_hour: hourly,
                requests_per_day: daily,
            },
            Arc::new(clock.clone()),
        )
    }

    #[test]
    fn test_blocks_at_hourly_ceiling() {
        let clock = ManualClock::new();
        let mut tracker = tracker(3, 100, &clock);

        for _ in 0..3 {
            assert!(tracker.can_proceed());
            tracker.record_request();
        }

        assert!(!tracker.can_proceed());
        assert_eq!(tracker.counters().hourly_count, 3);
    }

    #[test]
    fn test_hourly_window_rolls_over_lazily() {
        let clock = ManualClock::new();
        let mut tracker = tracker(2, 100, &clock);
        tracker.record_request();
        tracker.record_request();
        assert!(!tracker.can_proceed());

        clock.advance(Duration::from_secs(3599));
        assert!(!tracker.can_proceed());

        clock.advance(Duration::from_secs(2));
        assert!(tracker.can_proceed());
        assert_eq!(tracker.counters().hourly_count, 0);
        assert_eq!(tracker.counters().daily_count, 2);
    }

    #[test]
    fn test_daily_ceiling_survives_hourly_rollover() {
        let clock = ManualClock::new();
        let mut tracker = tracker(10, 3, &clock);
        for _ in 0..3 {
            tracker.record_request();
        }

        clock.advance(HOUR + Duration::from_secs(1));
        assert!(!tracker.can_proceed());
        assert_eq!(tracker.counters().hourly_count, 0);

        clock.advance(DAY);
        assert!(tracker.can_proceed());
        assert_eq!(tracker.counters().daily_count, 0);
    }

    #[test]
    fn test_status_is_read_only() {
        let clock = ManualClock::new();
        let mut tracker = tracker(5, 10, &clock);
        tracker.record_request();
        tracker.record_request();

        clock.advance(HOUR + Duration::from_secs(10));
        let status = tracker.status();

        assert_eq!(status.requests_this_hour, 0);
        assert_eq!(status.hourly_remaining, 5);
        assert_eq!(status.requests_today, 2);
        assert_eq!(status.daily_remaining, 8);
        assert!(status.can_proceed);
        // Underlying counters have not been rolled
        assert_eq!(tracker.counters().hourly_count, 2);
    }

    #[test]
    fn test_status_reports_reset_times() {
        let clock = ManualClock::new();
        let tracker = tracker(5, 10, &clock);
        clock.advance(Duration::from_secs(600));

        let status = tracker.status();
        assert_eq!(status.hourly_resets_in, Duration::from_secs(3000));
        assert_eq!(status.daily_resets_in, DAY - Duration::from_secs(600));
    }

    #[test]
    fn test_total_recorded_spans_windows() {
        let clock = ManualClock::new();
        let mut tracker = tracker(5, 100, &clock);
        tracker.record_request();
        clock.advance(HOUR * 2);
        tracker.record_request();

        assert_eq!(tracker.total_recorded(), 2);
        assert_eq!(tracker.status().requests_this_hour, 1);
    }
}
