//! Quota-aware request governor for hosted LLM APIs
//!
//! Wraps a model capability (`prompt -> text`) so that a single process stays
//! under the provider's rate limits:
//!
//! - calls are spaced by the requests-per-minute ceiling, with jitter
//! - quota rejections back off exponentially and retry
//! - exhausted retries degrade to a local fallback answer
//! - hourly and daily request counts are tracked against their ceilings
//! - repeated prompts are served from a local cache
//! - batches are paced with pauses between items and groups
//!
//! There is no cross-process coordination.

pub mod batch;
pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod fallback;
pub mod model;
pub mod outcome;
pub mod planning;
pub mod providers;
pub mod quota;
pub mod rate_limiter;

// Re-export commonly used types
pub use batch::{BatchReport, BatchRunner, BatchStats};
pub use cache::{CacheKey, LocalCache};
pub use client::{ClientStats, GovernedClient, GovernedClientBuilder};
pub use clock::{Clock, ManualClock, TokioClock};
pub use config::GovernorConfig;
pub use error::{GovernorError, GovernorResult};
pub use model::ModelCapability;
pub use outcome::{InvocationOutcome, OutcomeKind};
pub use providers::{GeminiConfig, GeminiModel};
pub use quota::{QuotaStatus, QuotaTracker};
pub use rate_limiter::RateLimiter;
