//! Configuration validation

use super::GovernorConfig;
use crate::error::{GovernorError, GovernorResult};

impl GovernorConfig {
    /// Reject configurations the governor cannot operate with.
    ///
    /// All problems are reported together.
    pub fn validate(&self) -> GovernorResult<()> {
        let mut errors = Vec::new();

        if self.rate_limit.requests_per_minute == 0 {
            errors.push("rate_limit.requests_per_minute must be greater than 0");
        }
        if self.quota.requests_per_hour == 0 {
            errors.push("quota.requests_per_hour must be greater than 0");
        }
        if self.quota.requests_per_day == 0 {
            errors.push("quota.requests_per_day must be greater than 0");
        }
        if self.retry.max_retries == 0 {
            errors.push("retry.max_retries must be greater than 0");
        }
        if self.batch.batch_size == 0 {
            errors.push("batch.batch_size must be greater than 0");
        }
        if self.fallback.truncate_chars == 0 {
            errors.push("fallback.truncate_chars must be greater than 0");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(GovernorError::config_with_context(
                errors.join("; "),
                "Validating governor configuration",
            ))
        }
    }
}
