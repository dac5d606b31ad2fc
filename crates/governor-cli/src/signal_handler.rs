//! Ctrl+C handling
//!
//! The first SIGINT cancels the governor's token so that pending waits end and
//! the current run reports what it has. A second SIGINT exits immediately.

use futures::stream::StreamExt;
use signal_hook::consts::SIGINT;
use signal_hook_tokio::Signals;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn the SIGINT listener for `cancel`
pub fn spawn_interrupt_handler(cancel: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    let mut signals = Signals::new([SIGINT])?;

    Ok(tokio::spawn(async move {
        while let Some(signal) = signals.next().await {
            if signal != SIGINT {
                continue;
            }
            if cancel.is_cancelled() {
                eprintln!("\nInterrupted again, exiting");
                std::process::exit(130);
            }
            eprintln!("\nInterrupt received, cancelling pending requests (Ctrl+C again to exit)");
            cancel.cancel();
        }
    }))
}
