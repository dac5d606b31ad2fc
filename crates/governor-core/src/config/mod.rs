//! Configuration for the request governor
//!
//! All limits are plain values fixed at construction time. Defaults match the
//! free tier of the hosted model provider (15 requests per minute).
//!
//! Loading order used by the CLI: file (`load_from_file`), then environment
//! overrides (`apply_env_overrides`), then `validate`.

mod env_loader;
mod file_loader;
mod logging_config;
mod validation;

pub use env_loader::{ENV_PREFIX, apply_env_overrides, apply_overrides_from};
pub use file_loader::load_from_file;
pub use logging_config::{LogFormat, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level governor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    pub rate_limit: RateLimitConfig,
    pub quota: QuotaConfig,
    pub retry: RetryConfig,
    pub batch: BatchConfig,
    pub fallback: FallbackConfig,
    pub logging: LoggingConfig,
}

/// Outbound call spacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Provider's requests-per-minute ceiling
    pub requests_per_minute: u32,
    /// Upper bound of the random jitter added to each throttling wait
    #[serde(with = "humantime_serde")]
    pub max_jitter: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 15,
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RateLimitConfig {
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            requests_per_minute,
            ..Default::default()
        }
    }

    /// Disable jitter, mostly useful for deterministic tests
    pub fn without_jitter(mut self) -> Self {
        self.max_jitter = Duration::ZERO;
        self
    }

    /// Minimum spacing between two outbound calls.
    ///
    /// A zero rate yields a zero interval; `validate` rejects that configuration.
    pub fn min_interval(&self) -> Duration {
        if self.requests_per_minute == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(60) / self.requests_per_minute
    }
}

/// Rolling request ceilings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub requests_per_hour: u32,
    pub requests_per_day: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            requests_per_hour: 900,
            requests_per_day: 21_600,
        }
    }
}

/// Retry behaviour on quota rejections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts made before falling back
    pub max_retries: u32,
    /// Wait after the first quota error; doubles on each consecutive one
    #[serde(with = "humantime_serde")]
    pub base_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_secs(60),
        }
    }
}

/// Batch pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub batch_size: usize,
    #[serde(with = "humantime_serde")]
    pub inter_item_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub inter_batch_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            inter_item_delay: Duration::from_millis(4500),
            inter_batch_delay: Duration::from_secs(10),
        }
    }
}

/// Local degraded answer used when retries are exhausted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Prompts with more words than this get the first/second-to-last sentence summary
    pub word_threshold: usize,
    /// Character budget for the truncated answer
    pub truncate_chars: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            word_threshold: 100,
            truncate_chars: 200,
        }
    }
}
