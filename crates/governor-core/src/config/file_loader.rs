//! Governor config files
//!
//! The format follows the extension: `.toml`, `.yaml`/`.yml`, anything else is
//! read as JSON. Every section is optional and falls back to the free-tier
//! defaults.

use super::GovernorConfig;
use crate::error::{GovernorError, GovernorResult};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Top-level tables a governor config file may contain
const SECTIONS: &str = "rate_limit, quota, retry, batch, fallback, logging";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::Toml,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    fn parse(self, content: &str) -> Result<GovernorConfig, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => write!(f, "TOML"),
            Self::Yaml => write!(f, "YAML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

/// Read governor limits from `path`.
///
/// A missing file is not an error: the governor then runs on its defaults.
pub fn load_from_file(path: &Path) -> GovernorResult<GovernorConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no governor config file, using defaults");
        return Ok(GovernorConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        GovernorError::config_with_context(
            format!("Cannot read governor limits: {}", e),
            format!("config file '{}'", path.display()),
        )
    })?;

    let format = ConfigFormat::from_path(path);
    let config = format.parse(&content).map_err(|reason| {
        GovernorError::config_with_context(
            format!(
                "Invalid {} governor config (expected sections: {}): {}",
                format, SECTIONS, reason
            ),
            format!("config file '{}'", path.display()),
        )
    })?;

    debug!(path = %path.display(), %format, "loaded governor config");
    Ok(config)
}
