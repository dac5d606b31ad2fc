//! Single governed prompt

use super::build_client;
use crate::args::ModelArgs;
use crate::console::CliConsole;
use crate::signal_handler::spawn_interrupt_handler;
use anyhow::{Result, bail};
use governor_core::{GovernorConfig, InvocationOutcome};

pub async fn execute(
    config: GovernorConfig,
    prompt: &str,
    model_args: &ModelArgs,
    console: &CliConsole,
) -> Result<()> {
    let client = build_client(config, model_args)?;
    let _signals = spawn_interrupt_handler(client.cancellation_token())?;

    console.info(&format!("Sending prompt to {}", model_args.model));
    let outcome = client.invoke(prompt).await;
    console.print_outcome(1, &outcome);

    match outcome {
        InvocationOutcome::Success(_) => Ok(()),
        InvocationOutcome::FallbackUsed(_) => {
            console.warn("Provider quota exhausted; answer is a local fallback");
            Ok(())
        }
        InvocationOutcome::QuotaExceeded => bail!("Local quota ceiling reached"),
        InvocationOutcome::ProviderFailure(detail) => bail!("Provider failure: {}", detail),
        InvocationOutcome::Cancelled => bail!("Cancelled"),
    }
}
