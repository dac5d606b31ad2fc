//! Usage counters for a governed client

use serde::Serialize;

/// Cumulative counters since the client was built
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientStats {
    /// Calls to `invoke`, whatever their outcome
    pub total_invocations: u64,
    /// Requests handed to the model, including ones rejected for quota
    pub provider_calls: u64,
    /// Requests the model answered; these are the ones counted against quota
    pub successful_requests: u64,
    pub cache_hits: u64,
    /// Quota rejections received from the provider
    pub quota_errors: u64,
    pub fallbacks: u64,
    pub provider_failures: u64,
    /// Invocations refused locally because a quota ceiling was reached
    pub quota_refusals: u64,
    pub cancellations: u64,
}
