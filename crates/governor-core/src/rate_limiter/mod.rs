//! Outbound call spacing and quota-error backoff
//!
//! Spacing calls by a fixed minimum interval behaves like a token bucket with
//! a rate of `requests_per_minute` and a burst of one. Each throttling wait gets
//! a random jitter so that retries from several callers do not wake together.

mod backoff;
mod limiter;


pub use backoff::exponential_backoff;
pub use limiter::{RateLimiter, RateLimiterState};
