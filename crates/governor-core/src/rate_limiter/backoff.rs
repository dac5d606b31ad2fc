//! Backoff schedule for consecutive quota errors

use std::time::Duration;

/// Wait imposed after the `failures`-th consecutive quota error.
///
/// `base * 2^(failures - 1)`: with a 60s base this yields 60s, 120s, 240s, ...
/// Zero failures means no wait. Saturates at `Duration::MAX` instead of
/// overflowing.
pub fn exponential_backoff(base: Duration, failures: u32) -> Duration {
    if failures == 0 {
        return Duration::ZERO;
    }

    2u32.checked_pow(failures - 1)
        .and_then(|factor| base.checked_mul(factor))
        .unwrap_or(Duration::MAX)
}
