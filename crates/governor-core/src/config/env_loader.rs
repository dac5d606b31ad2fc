//! Environment variable overrides

use super::GovernorConfig;
use crate::error::{GovernorError, GovernorResult};
use std::env;
use std::str::FromStr;

/// Prefix shared by every governor environment variable
pub const ENV_PREFIX: &str = "GOVERNOR_";

/// Apply `GOVERNOR_*` environment variables on top of `config`
pub fn apply_env_overrides(config: &mut GovernorConfig) -> GovernorResult<()> {
    apply_overrides_from(config, |name| env::var(name).ok())
}

/// Apply overrides using an arbitrary variable lookup
///
/// Unknown or unset variables are ignored; a set variable that does not parse
/// is a configuration error.
pub fn apply_overrides_from<F>(config: &mut GovernorConfig, lookup: F) -> GovernorResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| lookup(&format!("{}{}", ENV_PREFIX, suffix));

    if let Some(value) = var("REQUESTS_PER_MINUTE") {
        config.rate_limit.requests_per_minute = parse("REQUESTS_PER_MINUTE", &value)?;
    }
    if let Some(value) = var("REQUESTS_PER_HOUR") {
        config.quota.requests_per_hour = parse("REQUESTS_PER_HOUR", &value)?;
    }
    if let Some(value) = var("REQUESTS_PER_DAY") {
        config.quota.requests_per_day = parse("REQUESTS_PER_DAY", &value)?;
    }
    if let Some(value) = var("MAX_RETRIES") {
        config.retry.max_retries = parse("MAX_RETRIES", &value)?;
    }
    if let Some(value) = var("BATCH_SIZE") {
        config.batch.batch_size = parse("BATCH_SIZE", &value)?;
    }
    if let Some(value) = var("LOG_LEVEL") {
        config.logging.level = value;
    }

    Ok(())
}

fn parse<T: FromStr>(suffix: &str, value: &str) -> GovernorResult<T> {
    value.trim().parse().map_err(|_| {
        GovernorError::config(format!(
            "Invalid {}{} value: '{}'",
            ENV_PREFIX, suffix, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = GovernorConfig::default();
        apply_overrides_from(
            &mut config,
            lookup(&[
                ("GOVERNOR_REQUESTS_PER_MINUTE", "30"),
                ("GOVERNOR_MAX_RETRIES", "5"),
                ("GOVERNOR_BATCH_SIZE", " 2 "),
                ("GOVERNOR_LOG_LEVEL", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.rate_limit.requests_per_minute, 30);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.batch.batch_size, 2);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.quota.requests_per_hour, 900);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let mut config = GovernorConfig::default();
        let err = apply_overrides_from(
            &mut config,
            lookup(&[("GOVERNOR_REQUESTS_PER_DAY", "lots")]),
        )
        .unwrap_err();

        assert!(err.to_string().contains("GOVERNOR_REQUESTS_PER_DAY"));
    }

    #[test]
    fn test_no_variables_is_noop() {
        let mut config = GovernorConfig::default();
        apply_overrides_from(&mut config, |_| None).unwrap();
        assert_eq!(config.rate_limit.requests_per_minute, 15);
    }
}
