//! CLI argument definitions using clap
//!
//! - governor run prompts.txt      # Governed batch over a prompt file
//! - governor ask "question"       # Single governed invocation
//! - governor estimate 20          # Pacing estimate for N items
//! - governor config show|validate # Inspect the effective configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file name used across all CLI commands.
pub const DEFAULT_CONFIG_FILE: &str = "governor.toml";

#[derive(Parser)]
#[command(name = "governor")]
#[command(about = "Quota-aware request governor for hosted LLM APIs")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (TOML, YAML or JSON)
    #[arg(long = "config", global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every prompt of a file (one per line) as a paced batch
    Run {
        /// File with one prompt per non-empty line
        file: PathBuf,

        /// Override the configured batch size
        #[arg(long)]
        batch_size: Option<usize>,

        /// Print outcomes and statistics as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Send a single governed prompt
    Ask {
        prompt: String,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Estimate how long a batch of N items takes
    Estimate {
        items: usize,

        /// Window over which the requests should be spread, in minutes
        #[arg(long, default_value_t = 60)]
        window_minutes: u64,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (file + environment)
    Show,
    /// Validate the effective configuration
    Validate,
}

/// Model connection options
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Google API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Gemini model name
    #[arg(long, default_value = governor_core::providers::DEFAULT_MODEL)]
    pub model: String,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,
}
