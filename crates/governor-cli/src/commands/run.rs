//! Governed batch over a prompt file

use super::build_client;
use crate::args::ModelArgs;
use crate::console::CliConsole;
use crate::signal_handler::spawn_interrupt_handler;
use anyhow::{Context, Result};
use governor_core::{BatchRunner, BatchStats, GovernorConfig};
use std::path::Path;

/// Non-empty, trimmed lines of `content`
pub fn parse_prompts(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Items that ended without a model or fallback answer
pub fn unanswered(stats: &BatchStats) -> usize {
    stats.provider_failures + stats.cancelled + stats.quota_exceeded
}

pub async fn execute(
    mut config: GovernorConfig,
    file: &Path,
    batch_size: Option<usize>,
    json: bool,
    model_args: &ModelArgs,
    console: &CliConsole,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read prompts from {}", file.display()))?;
    let prompts = parse_prompts(&content);
    if prompts.is_empty() {
        console.warn("No prompts found");
        return Ok(());
    }

    if let Some(size) = batch_size {
        config.batch.batch_size = size;
    }

    let client = build_client(config, model_args)?;
    let _signals = spawn_interrupt_handler(client.cancellation_token())?;

    console.info(&format!(
        "Processing {} prompts in batches of {}",
        prompts.len(),
        client.config().batch.batch_size
    ));

    let report = BatchRunner::new(&client).run(&prompts).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    console.print_header("Results");
    for (index, outcome) in report.outcomes.iter().enumerate() {
        console.print_outcome(index + 1, outcome);
    }

    let stats = &report.stats;
    console.print_header("Statistics");
    console.print_stat("Items", stats.total_items);
    console.print_stat("Batches", stats.batches);
    console.print_stat("Successes", stats.successes);
    console.print_stat("Fallbacks", stats.fallbacks);
    console.print_stat("Quota refusals", stats.quota_exceeded);
    console.print_stat("Provider failures", stats.provider_failures);
    console.print_stat("Cancelled", stats.cancelled);
    console.print_stat("Cache hits", stats.cache_hits);
    console.print_stat("Provider calls", stats.provider_calls);
    console.print_stat("Requests sent", stats.requests_sent);
    console.print_stat("Elapsed", format!("{:.1}s", stats.elapsed.as_secs_f64()));

    let quota = client.quota_status().await;
    console.print_stat("Remaining this hour", quota.hourly_remaining);
    console.print_stat("Remaining today", quota.daily_remaining);

    let missing = unanswered(stats);
    if missing > 0 {
        console.warn(&format!("{} prompts were not answered", missing));
    } else {
        console.success("All prompts answered");
    }

    Ok(())
}
