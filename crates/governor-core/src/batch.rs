//! Paced batch processing through a governed client
//!
//! Inputs are split into consecutive groups of at most `batch_size`. Every item
//! is followed by `inter_item_delay` and every group but the last by
//! `inter_batch_delay`; nothing sleeps after the final item.

use crate::client::GovernedClient;
use crate::clock::sleep_cancellable;
use crate::config::BatchConfig;
use crate::outcome::{InvocationOutcome, OutcomeKind};
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Per-run statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub total_items: usize,
    pub batches: usize,
    pub successes: usize,
    pub fallbacks: usize,
    pub quota_exceeded: usize,
    pub provider_failures: usize,
    pub cancelled: usize,
    /// Items answered from the cache
    pub cache_hits: u64,
    /// Raw requests handed to the provider during this run
    pub provider_calls: u64,
    /// Requests the provider answered, i.e. counted against quota
    pub requests_sent: u64,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

impl BatchStats {
    fn count(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Success => self.successes += 1,
            OutcomeKind::FallbackUsed => self.fallbacks += 1,
            OutcomeKind::QuotaExceeded => self.quota_exceeded += 1,
            OutcomeKind::ProviderFailure => self.provider_failures += 1,
            OutcomeKind::Cancelled => self.cancelled += 1,
        }
    }
}

/// Outcomes in input order, plus statistics
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<InvocationOutcome>,
    pub stats: BatchStats,
}

/// Drives inputs through a [`GovernedClient`] in paced groups
pub struct BatchRunner<'a> {
    client: &'a GovernedClient,
    config: BatchConfig,
    max_retries: u32,
    cancel: CancellationToken,
}

impl<'a> BatchRunner<'a> {
    /// Runner using the client's batch and retry settings.
    ///
    /// Cancelling the client's token also cancels the runner.
    pub fn new(client: &'a GovernedClient) -> Self {
        Self {
            client,
            config: client.config().batch.clone(),
            max_retries: client.config().retry.max_retries,
            cancel: client.cancellation_token().child_token(),
        }
    }

    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops this run
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Process `items` in order, returning exactly one outcome per item.
    ///
    /// After cancellation no further item is sent; the remaining ones are
    /// reported as [`InvocationOutcome::Cancelled`].
    #[instrument(skip_all, fields(items = items.len(), batch_size = self.config.batch_size))]
    pub async fn run<S: AsRef<str>>(&self, items: &[S]) -> BatchReport {
        let clock = self.client.clock();
        let started = clock.now();
        let before = self.client.stats();

        let batch_size = self.config.batch_size.max(1);
        let total_batches = items.len().div_ceil(batch_size);
        let mut outcomes = Vec::with_capacity(items.len());
        let mut stats = BatchStats {
            total_items: items.len(),
            batches: total_batches,
            ..Default::default()
        };
        let mut cancelled = self.cancel.is_cancelled();

        for (batch_index, batch) in items.chunks(batch_size).enumerate() {
            let last_batch = batch_index + 1 == total_batches;
            info!(
                batch = batch_index + 1,
                total_batches,
                size = batch.len(),
                "processing batch"
            );

            for (item_index, item) in batch.iter().enumerate() {
                if cancelled {
                    outcomes.push(InvocationOutcome::Cancelled);
                    continue;
                }

                let outcome = self
                    .client
                    .invoke_with(item.as_ref(), self.max_retries, &self.cancel)
                    .await;
                debug!(item = outcomes.len() + 1, outcome = %outcome.kind(), "item processed");
                cancelled = outcome == InvocationOutcome::Cancelled;
                outcomes.push(outcome);

                let last_item = last_batch && item_index + 1 == batch.len();
                if !cancelled && !last_item {
                    cancelled = sleep_cancellable(
                        clock.as_ref(),
                        self.config.inter_item_delay,
                        &self.cancel,
                    )
                    .await
                    .is_err();
                }
            }

            if !cancelled && !last_batch {
                debug!(
                    delay_secs = self.config.inter_batch_delay.as_secs_f64(),
                    "pausing between batches"
                );
                cancelled = sleep_cancellable(
                    clock.as_ref(),
                    self.config.inter_batch_delay,
                    &self.cancel,
                )
                .await
                .is_err();
            }
        }

        for outcome in &outcomes {
            stats.count(outcome.kind());
        }
        let after = self.client.stats();
        stats.cache_hits = after.cache_hits - before.cache_hits;
        stats.provider_calls = after.provider_calls - before.provider_calls;
        stats.requests_sent = after.successful_requests - before.successful_requests;
        stats.elapsed = clock.now().saturating_duration_since(started);

        if stats.cancelled > 0 {
            warn!(cancelled = stats.cancelled, "batch run cancelled");
        }
        info!(
            total = stats.total_items,
            successes = stats.successes,
            fallbacks = stats.fallbacks,
            requests_sent = stats.requests_sent,
            "batch run finished"
        );

        BatchReport { outcomes, stats }
    }
}
