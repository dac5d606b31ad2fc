//! Rolling hourly/daily request accounting
//!
//! Windows roll over lazily: counters are reset the next time they are
//! consulted after their window has elapsed, never by a background timer.

mod tracker;

pub use tracker::{DAY, HOUR, QuotaCounters, QuotaStatus, QuotaTracker};
