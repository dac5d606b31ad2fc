//! Pacing estimate

use crate::console::CliConsole;
use governor_core::GovernorConfig;
use governor_core::planning::{estimate_processing_time, optimal_delay};
use std::time::Duration;

pub fn execute(config: &GovernorConfig, items: usize, window_minutes: u64, console: &CliConsole) {
    let estimate = estimate_processing_time(items, &config.batch);
    let requests = u32::try_from(items).unwrap_or(u32::MAX);
    let delay = optimal_delay(
        requests,
        Duration::from_secs(window_minutes.saturating_mul(60)),
        &config.rate_limit,
    );

    console.print_header("Estimate");
    console.print_stat("Items", items);
    console.print_stat("Batch size", config.batch.batch_size);
    console.print_stat(
        "Estimated time",
        format!("{:.1} min", estimate.as_secs_f64() / 60.0),
    );
    console.print_stat(
        format!("Optimal delay ({} min)", window_minutes).as_str(),
        format!("{:.1}s", delay.as_secs_f64()),
    );
    console.print_stat(
        "Minimum interval",
        format!("{:.1}s", config.rate_limit.min_interval().as_secs_f64()),
    );
}
