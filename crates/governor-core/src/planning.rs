//! Back-of-the-envelope pacing calculations

use crate::config::{BatchConfig, RateLimitConfig};
use std::time::Duration;

/// Spacing that spreads `total_requests` evenly over `window`, plus one second
/// of margin, never below the rate limiter's minimum interval.
///
/// Zero requests need no spacing.
pub fn optimal_delay(total_requests: u32, window: Duration, rate_limit: &RateLimitConfig) -> Duration {
    if total_requests == 0 {
        return Duration::ZERO;
    }

    let spread = window / total_requests + Duration::from_secs(1);
    spread.max(rate_limit.min_interval())
}

/// Time a batch run of `num_items` will take on delays alone
///
/// `items * inter_item_delay + (batches - 1) * inter_batch_delay`; model
/// latency and throttling waits are not included.
pub fn estimate_processing_time(num_items: usize, batch: &BatchConfig) -> Duration {
    if num_items == 0 {
        return Duration::ZERO;
    }

    let batches = num_items.div_ceil(batch.batch_size.max(1));
    let items = u32::try_from(num_items).unwrap_or(u32::MAX);
    let pauses = u32::try_from(batches - 1).unwrap_or(u32::MAX);

    batch.inter_item_delay.saturating_mul(items)
        + batch.inter_batch_delay.saturating_mul(pauses)
}
