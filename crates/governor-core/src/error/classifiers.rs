//! Failure classification for the retry path

use super::types::GovernorError;

/// Markers that identify a provider-side rate-limit rejection
const QUOTA_MARKERS: &[&str] = &[
    "quota",
    "429",
    "rate limit",
    "resource_exhausted",
    "too many requests",
];

/// How the governor reacts to a failed model call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rate-limit rejection: back off and retry
    Quota,
    /// Anything else reported by the provider or transport: surface immediately
    Provider,
    /// The caller cancelled while we were waiting
    Cancelled,
}

/// Decide how a model failure should be handled.
///
/// Typed quota errors and 429 statuses are quota failures. Untyped errors are
/// inspected for a quota marker in their message, since providers reach us
/// through several client layers that do not all preserve the status.
pub fn classify_failure(error: &GovernorError) -> FailureKind {
    match error {
        GovernorError::QuotaExceeded { .. } => FailureKind::Quota,
        GovernorError::Cancelled => FailureKind::Cancelled,
        GovernorError::Provider {
            status_code: Some(429),
            ..
        }
        | GovernorError::Http {
            status_code: Some(429),
            ..
        } => FailureKind::Quota,
        other => {
            let msg = other.to_string().to_lowercase();
            if QUOTA_MARKERS.iter().any(|marker| msg.contains(marker)) {
                FailureKind::Quota
            } else {
                FailureKind::Provider
            }
        }
    }
}
