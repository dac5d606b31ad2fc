//! Tests for the governed client

use super::GovernedClient;
use crate::clock::ManualClock;
use crate::config::{GovernorConfig, QuotaConfig, RateLimitConfig};
use crate::error::{GovernorError, GovernorResult};
use crate::model::ModelCapability;
use crate::outcome::InvocationOutcome;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Model that replays a fixed script, then echoes the prompt
#[derive(Default)]
struct ScriptedModel {
    script: Mutex<VecDeque<GovernorResult<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(script: Vec<GovernorResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl ModelCapability for ScriptedModel {
    async fn invoke(&self, prompt: &str) -> GovernorResult<String> {
        self.prompts.lock().push(prompt.to_string());
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| Ok(format!("answer: {}", prompt)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn quota_error() -> GovernorResult<String> {
    Err(GovernorError::quota_exceeded("429 RESOURCE_EXHAUSTED"))
}

fn test_config() -> GovernorConfig {
    GovernorConfig {
        rate_limit: RateLimitConfig::new(15).without_jitter(),
        ..Default::default()
    }
}

fn client(model: Arc<ScriptedModel>, clock: &ManualClock) -> GovernedClient {
    GovernedClient::builder(model)
        .config(test_config())
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_success_is_cached_and_counted() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![Ok("Python is a language.".into())]);
    let client = client(model.clone(), &clock);

    let outcome = client.invoke("What is Python?").await;

    assert_eq!(
        outcome,
        InvocationOutcome::Success("Python is a language.".into())
    );
    assert_eq!(model.calls(), 1);
    assert_eq!(client.quota_status().await.requests_this_hour, 1);
    assert_eq!(client.cache_statistics().entries, 1);
}

#[tokio::test]
async fn test_cache_hit_bypasses_limiter_and_quota() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![Ok("cached".into())]);
    let client = client(model.clone(), &clock);

    client.invoke("same question").await;
    let quota_before = client.quota_status().await;
    let limiter_before = client.rate_limiter_state().await;
    clock.clear_sleeps();

    let outcome = client.invoke("  same   question ").await;

    assert_eq!(outcome, InvocationOutcome::Success("cached".into()));
    assert_eq!(model.calls(), 1);
    assert_eq!(client.quota_status().await, quota_before);
    assert_eq!(client.rate_limiter_state().await, limiter_before);
    assert!(clock.sleeps().is_empty());
    assert_eq!(client.stats().cache_hits, 1);
}

#[tokio::test]
async fn test_quota_exhaustion_falls_back_after_three_backoffs() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![quota_error(), quota_error(), quota_error()]);
    let client = client(model.clone(), &clock);

    let outcome = client.invoke_with_retries("Short prompt", 3).await;

    assert_eq!(
        outcome,
        InvocationOutcome::FallbackUsed("Short prompt".into())
    );
    assert_eq!(model.calls(), 3);
    assert_eq!(
        clock.sleeps(),
        vec![
            Duration::from_secs(60),
            Duration::from_secs(120),
            Duration::from_secs(240),
        ]
    );
    assert_eq!(client.quota_status().await.requests_this_hour, 0);
    assert_eq!(client.stats().successful_requests, 0);
    assert_eq!(client.stats().fallbacks, 1);
    // Fallback answers are not cached
    assert_eq!(client.cache_statistics().entries, 0);
}

#[tokio::test]
async fn test_recovery_after_quota_error() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![quota_error(), Ok("second time lucky".into())]);
    let client = client(model.clone(), &clock);

    let outcome = client.invoke("retry me").await;

    assert_eq!(outcome, InvocationOutcome::Success("second time lucky".into()));
    assert_eq!(model.calls(), 2);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(60)]);
    assert_eq!(client.rate_limiter_state().await.consecutive_failures, 0);
}

#[tokio::test]
async fn test_provider_error_is_not_retried() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![Err(GovernorError::provider_with_status(
        "API key not valid",
        401,
    ))]);
    let client = client(model.clone(), &clock);

    let outcome = client.invoke("anything").await;

    match outcome {
        InvocationOutcome::ProviderFailure(detail) => assert!(detail.contains("API key")),
        other => panic!("expected provider failure, got {:?}", other),
    }
    assert_eq!(model.calls(), 1);
    assert!(clock.sleeps().is_empty());
    assert_eq!(client.stats().provider_failures, 1);
}

#[tokio::test]
async fn test_untyped_quota_message_is_retried() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![
        Err(GovernorError::provider("You exceeded your current quota")),
        Ok("ok".into()),
    ]);
    let client = client(model.clone(), &clock);

    assert_eq!(
        client.invoke("prompt").await,
        InvocationOutcome::Success("ok".into())
    );
    assert_eq!(client.stats().quota_errors, 1);
}

#[tokio::test]
async fn test_local_ceiling_refuses_without_calling_model() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![]);
    let config = GovernorConfig {
        rate_limit: RateLimitConfig::new(15).without_jitter(),
        quota: QuotaConfig {
            requests_per_hour: 2,
            requests_per_day: 100,
        },
        ..Default::default()
    };
    let client = GovernedClient::builder(model.clone())
        .config(config)
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap();

    client.invoke("one").await;
    client.invoke("two").await;
    let outcome = client.invoke("three").await;

    assert_eq!(outcome, InvocationOutcome::QuotaExceeded);
    assert_eq!(model.calls(), 2);
    assert_eq!(client.stats().quota_refusals, 1);

    clock.advance(Duration::from_secs(3600));
    assert!(client.invoke("three").await.is_success());
}

#[tokio::test]
async fn test_consecutive_calls_are_spaced() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![]);
    let client = client(model, &clock);

    client.invoke("a").await;
    client.invoke("b").await;
    client.invoke("c").await;

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(4); 2]);
}

#[tokio::test]
async fn test_cancelled_before_invoke() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![quota_error()]);
    let client = client(model.clone(), &clock);
    let token = CancellationToken::new();
    token.cancel();

    let outcome = client.invoke_with("prompt", 3, &token).await;

    assert_eq!(outcome, InvocationOutcome::Cancelled);
    assert_eq!(model.calls(), 0);
    assert_eq!(client.stats().cancellations, 1);
}

#[tokio::test]
async fn test_zero_retries_still_attempts_once() {
    let clock = ManualClock::new();
    let model = ScriptedModel::new(vec![quota_error()]);
    let client = client(model.clone(), &clock);

    let outcome = client.invoke_with_retries("prompt", 0).await;

    assert!(outcome.is_degraded());
    assert_eq!(model.calls(), 1);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = GovernorConfig::default();
    config.retry.max_retries = 0;
    let model = ScriptedModel::new(vec![]);

    assert!(GovernedClient::new(config, model).is_err());
}

/// Model that never answers
struct HangingModel;

#[async_trait]
impl ModelCapability for HangingModel {
    async fn invoke(&self, _prompt: &str) -> GovernorResult<String> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "hanging"
    }
}

fn tokio_clock_client(model: Arc<dyn ModelCapability>) -> GovernedClient {
    GovernedClient::builder(model)
        .config(test_config())
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_backoff() {
    let model = ScriptedModel::new((0..5).map(|_| quota_error()).collect());
    let client = tokio_clock_client(model.clone());
    let token = client.cancellation_token();
    let started = tokio::time::Instant::now();

    // Attempts at 0s and 60s; the second backoff (120s) is interrupted at 90s
    let (outcome, _) = tokio::join!(client.invoke("prompt"), async {
        tokio::time::sleep(Duration::from_secs(90)).await;
        token.cancel();
    });

    assert_eq!(outcome, InvocationOutcome::Cancelled);
    assert_eq!(model.calls(), 2);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(90) && elapsed < Duration::from_secs(91));
    assert_eq!(client.stats().cancellations, 1);
    assert_eq!(client.stats().fallbacks, 0);
    assert_eq!(client.quota_status().await.requests_this_hour, 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_while_model_call_in_flight() {
    let client = tokio_clock_client(Arc::new(HangingModel));
    let token = client.cancellation_token();
    let started = tokio::time::Instant::now();

    let (outcome, _) = tokio::join!(client.invoke("prompt"), async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        token.cancel();
    });

    assert_eq!(outcome, InvocationOutcome::Cancelled);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_secs(6));
    assert_eq!(client.stats().provider_calls, 1);
    assert_eq!(client.stats().successful_requests, 0);
}
