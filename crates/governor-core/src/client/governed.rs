//! Core invoke path

use super::builder::GovernedClientBuilder;
use super::stats::ClientStats;
use crate::cache::{CacheKey, CacheStatistics, LocalCache};
use crate::clock::Clock;
use crate::config::GovernorConfig;
use crate::error::{FailureKind, GovernorResult, classify_failure};
use crate::fallback::fallback_response;
use crate::model::ModelCapability;
use crate::outcome::InvocationOutcome;
use crate::quota::{QuotaStatus, QuotaTracker};
use crate::rate_limiter::{RateLimiter, RateLimiterState};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Limiter and tracker are only ever touched together, under one lock, so the
/// check-then-act sequences (`wait_if_needed` + stamp, `can_proceed` +
/// `record_request`) cannot interleave between concurrent callers.
#[derive(Debug)]
struct Gate {
    limiter: RateLimiter,
    quota: QuotaTracker,
}

/// Model client that stays under the provider's quotas
pub struct GovernedClient {
    model: Arc<dyn ModelCapability>,
    config: GovernorConfig,
    clock: Arc<dyn Clock>,
    gate: tokio::sync::Mutex<Gate>,
    cache: Mutex<LocalCache>,
    stats: Mutex<ClientStats>,
    cancel: CancellationToken,
}

impl GovernedClient {
    /// Build a client on the real clock
    pub fn new(config: GovernorConfig, model: Arc<dyn ModelCapability>) -> GovernorResult<Self> {
        Self::builder(model).config(config).build()
    }

    pub fn builder(model: Arc<dyn ModelCapability>) -> GovernedClientBuilder {
        GovernedClientBuilder::new(model)
    }

    pub(super) fn from_parts(
        model: Arc<dyn ModelCapability>,
        config: GovernorConfig,
        clock: Arc<dyn Clock>,
        cancel: CancellationToken,
    ) -> Self {
        let gate = Gate {
            limiter: RateLimiter::new(&config.rate_limit, &config.retry, Arc::clone(&clock)),
            quota: QuotaTracker::new(&config.quota, Arc::clone(&clock)),
        };

        Self {
            model,
            config,
            clock,
            gate: tokio::sync::Mutex::new(gate),
            cache: Mutex::new(LocalCache::new()),
            stats: Mutex::new(ClientStats::default()),
            cancel,
        }
    }

    /// Invoke with the configured retry budget
    pub async fn invoke(&self, prompt: &str) -> InvocationOutcome {
        self.invoke_with_retries(prompt, self.config.retry.max_retries)
            .await
    }

    /// Invoke allowing up to `max_retries` attempts on quota errors
    pub async fn invoke_with_retries(&self, prompt: &str, max_retries: u32) -> InvocationOutcome {
        self.invoke_with(prompt, max_retries, &self.cancel).await
    }

    /// Invoke, aborting any wait when `cancel` fires.
    ///
    /// Cache hits return immediately and cost no quota. On a miss the call is
    /// refused if a quota ceiling is reached; otherwise up to `max_retries`
    /// attempts are made (at least one), each preceded by the throttling wait.
    /// Quota rejections back off and retry, then degrade to the local fallback;
    /// any other failure is returned at once.
    #[instrument(skip(self, prompt, cancel), fields(prompt_len = prompt.len(), model = self.model.name()))]
    pub async fn invoke_with(
        &self,
        prompt: &str,
        max_retries: u32,
        cancel: &CancellationToken,
    ) -> InvocationOutcome {
        self.stats.lock().total_invocations += 1;

        let key = CacheKey::for_prompt(prompt);
        if let Some(text) = self.cache.lock().get(&key) {
            debug!(key = %key, "cache hit");
            self.stats.lock().cache_hits += 1;
            return InvocationOutcome::Success(text);
        }

        let mut gate = self.gate.lock().await;

        if !gate.quota.can_proceed() {
            let status = gate.quota.status();
            warn!(
                hourly_remaining = status.hourly_remaining,
                daily_remaining = status.daily_remaining,
                "local quota ceiling reached, request not sent"
            );
            self.stats.lock().quota_refusals += 1;
            return InvocationOutcome::QuotaExceeded;
        }

        let attempts = max_retries.max(1);
        for attempt in 0..attempts {
            if gate.limiter.wait_if_needed(cancel).await.is_err() {
                return self.cancelled();
            }

            self.stats.lock().provider_calls += 1;
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(),
                result = self.model.invoke(prompt) => result,
            };

            match result {
                Ok(text) => {
                    gate.limiter.on_success();
                    gate.quota.record_request();
                    self.cache.lock().set(key, text.clone());
                    self.stats.lock().successful_requests += 1;
                    if attempt > 0 {
                        info!(attempt = attempt + 1, "request succeeded after retry");
                    }
                    return InvocationOutcome::Success(text);
                }
                Err(err) => match classify_failure(&err) {
                    FailureKind::Quota => {
                        self.stats.lock().quota_errors += 1;
                        warn!(
                            attempt = attempt + 1,
                            max_attempts = attempts,
                            error = %err,
                            "provider rejected request for quota"
                        );
                        if gate.limiter.on_quota_error(cancel).await.is_err() {
                            return self.cancelled();
                        }
                    }
                    FailureKind::Provider => {
                        error!(error = %err, "provider failure, not retrying");
                        self.stats.lock().provider_failures += 1;
                        return InvocationOutcome::ProviderFailure(err.to_string());
                    }
                    FailureKind::Cancelled => return self.cancelled(),
                },
            }
        }

        warn!(attempts, "retries exhausted on quota errors, using local fallback");
        self.stats.lock().fallbacks += 1;
        InvocationOutcome::FallbackUsed(self.fallback(prompt))
    }

    /// Local degraded answer for `prompt`; never touches cache or quota
    pub fn fallback(&self, prompt: &str) -> String {
        fallback_response(prompt, &self.config.fallback)
    }

    /// Quota snapshot.
    ///
    /// Waits for any in-flight invocation to release the gate.
    pub async fn quota_status(&self) -> QuotaStatus {
        self.gate.lock().await.quota.status()
    }

    /// Rate limiter snapshot; waits like [`GovernedClient::quota_status`]
    pub async fn rate_limiter_state(&self) -> RateLimiterState {
        self.gate.lock().await.limiter.state()
    }

    pub fn stats(&self) -> ClientStats {
        self.stats.lock().clone()
    }

    pub fn cache_statistics(&self) -> CacheStatistics {
        self.cache.lock().statistics()
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    /// Time source shared with the limiter and tracker
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// The client-wide cancellation token; cancelling it aborts every wait
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn cancelled(&self) -> InvocationOutcome {
        info!("invocation cancelled");
        self.stats.lock().cancellations += 1;
        InvocationOutcome::Cancelled
    }
}

impl std::fmt::Debug for GovernedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernedClient")
            .field("model", &self.model.name())
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
