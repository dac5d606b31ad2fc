//! The model capability the governor wraps

use crate::error::GovernorResult;
use async_trait::async_trait;

/// Anything that turns a prompt into a response
///
/// Implementations report rate-limit rejections as
/// [`GovernorError::QuotaExceeded`](crate::error::GovernorError::QuotaExceeded)
/// (or any error carrying a quota/429 marker) and every other failure as a
/// provider error.
#[async_trait]
pub trait ModelCapability: Send + Sync {
    /// Send `prompt` to the model and return its text answer
    async fn invoke(&self, prompt: &str) -> GovernorResult<String>;

    /// Name used in logs
    fn name(&self) -> &str;
}
