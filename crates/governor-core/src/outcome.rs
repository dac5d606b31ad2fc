//! Result of one governed invocation

use serde::Serialize;
use std::fmt;

/// Outcome of a single `invoke`, produced once per call regardless of how
/// many attempts it took.
///
/// `FallbackUsed` is not an error but must not be mistaken for a model answer:
/// consumers decide whether degraded text is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// Answer from the model, or from the cache
    Success(String),
    /// The local hourly or daily ceiling is exhausted; nothing was sent
    QuotaExceeded,
    /// Non-retryable provider failure
    ProviderFailure(String),
    /// Retries exhausted on quota errors; locally computed substitute
    FallbackUsed(String),
    /// The caller cancelled while the invocation was waiting
    Cancelled,
}

/// Discriminant of [`InvocationOutcome`], for statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    QuotaExceeded,
    ProviderFailure,
    FallbackUsed,
    Cancelled,
}

impl InvocationOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::QuotaExceeded => OutcomeKind::QuotaExceeded,
            Self::ProviderFailure(_) => OutcomeKind::ProviderFailure,
            Self::FallbackUsed(_) => OutcomeKind::FallbackUsed,
            Self::Cancelled => OutcomeKind::Cancelled,
        }
    }

    /// Text usable as an answer: model output or fallback
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success(text) | Self::FallbackUsed(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Answered, but not by the model
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::FallbackUsed(_))
    }

    /// No answer at all
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded | Self::ProviderFailure(_) | Self::Cancelled
        )
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::QuotaExceeded => "quota_exceeded",
            Self::ProviderFailure => "provider_failure",
            Self::FallbackUsed => "fallback_used",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_access() {
        assert_eq!(InvocationOutcome::Success("a".into()).text(), Some("a"));
        assert_eq!(InvocationOutcome::FallbackUsed("b".into()).text(), Some("b"));
        assert_eq!(InvocationOutcome::ProviderFailure("c".into()).text(), None);
        assert_eq!(InvocationOutcome::Cancelled.text(), None);
    }

    #[test]
    fn test_degraded_is_distinguishable() {
        let degraded = InvocationOutcome::FallbackUsed("summary".into());
        assert!(degraded.is_degraded());
        assert!(!degraded.is_success());
        assert!(!degraded.is_failure());
        assert_eq!(degraded.kind(), OutcomeKind::FallbackUsed);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(InvocationOutcome::FallbackUsed("x".into())).unwrap();
        assert_eq!(json["kind"], "fallback_used");
        assert_eq!(json["text"], "x");

        let json = serde_json::to_value(InvocationOutcome::QuotaExceeded).unwrap();
        assert_eq!(json["kind"], "quota_exceeded");
    }
}
