//! Command implementations

pub mod ask;
pub mod config;
pub mod estimate;
pub mod run;

use crate::args::ModelArgs;
use anyhow::{Context, Result};
use governor_core::config::{apply_env_overrides, load_from_file};
use governor_core::{GeminiConfig, GeminiModel, GovernedClient, GovernorConfig};
use std::path::Path;
use std::sync::Arc;

/// Effective configuration: file, then `GOVERNOR_*` environment overrides
pub fn load_config(path: &Path) -> Result<GovernorConfig> {
    let mut config = load_from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    apply_env_overrides(&mut config).context("Invalid environment override")?;
    Ok(config)
}

/// Governed client backed by the Gemini API
pub fn build_client(config: GovernorConfig, model_args: &ModelArgs) -> Result<GovernedClient> {
    let mut gemini = GeminiConfig::new(&model_args.api_key).with_model(&model_args.model);
    if let Some(base_url) = &model_args.base_url {
        gemini = gemini.with_base_url(base_url);
    }

    let model = GeminiModel::new(gemini).context("Failed to create Gemini client")?;
    let client = GovernedClient::new(config, Arc::new(model))
        .context("Failed to create governed client")?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_config_from_toml() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[batch]\nbatch_size = 7").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.batch.batch_size, 7);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = load_config(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.rate_limit.requests_per_minute, 15);
    }

    #[test]
    fn test_build_client_requires_api_key() {
        let args = ModelArgs {
            api_key: String::new(),
            model: "gemini-test".to_string(),
            base_url: None,
        };
        assert!(build_client(GovernorConfig::default(), &args).is_err());
    }
}
