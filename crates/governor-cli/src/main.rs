//! Quota governor CLI
//!
//! Runs prompts against the Gemini API without exceeding the free-tier
//! quotas. See `governor --help`.

mod args;
mod commands;
mod console;
mod signal_handler;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use console::CliConsole;
use governor_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let directive = if verbose {
        "debug".to_string()
    } else {
        logging.filter_directive()
    };
    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(&cli.config_file)?;
    init_logging(&config.logging, cli.verbose);
    tracing::debug!(config_file = %cli.config_file.display(), "configuration loaded");

    let console = CliConsole::new(cli.verbose);
    let result = match cli.command {
        Commands::Run {
            file,
            batch_size,
            json,
            model,
        } => commands::run::execute(config, &file, batch_size, json, &model, &console).await,
        Commands::Ask { prompt, model } => {
            commands::ask::execute(config, &prompt, &model, &console).await
        }
        Commands::Estimate {
            items,
            window_minutes,
        } => {
            commands::estimate::execute(&config, items, window_minutes, &console);
            Ok(())
        }
        Commands::Config { action } => commands::config::execute(&config, action, &console),
    };

    if let Err(e) = &result {
        console.error(&format!("{:#}", e));
    }
    result
}
