//! Core error type for the request governor

use thiserror::Error;

/// Result type alias for governor operations
pub type GovernorResult<T> = Result<T, GovernorError>;

/// Main error type for the request governor
#[derive(Error, Debug, Clone)]
pub enum GovernorError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// The provider rejected the request because a rate limit or quota was hit
    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    /// Any other failure reported by the model provider
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        status_code: Option<u16>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io { message: String },

    /// A wait was interrupted by the caller's cancellation signal
    #[error("Operation was cancelled")]
    Cancelled,
}

impl GovernorError {
    /// Short stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "GOVERNOR_CONFIG",
            Self::QuotaExceeded { .. } => "GOVERNOR_QUOTA",
            Self::Provider { .. } => "GOVERNOR_PROVIDER",
            Self::Http { .. } => "GOVERNOR_HTTP",
            Self::Json { .. } => "GOVERNOR_JSON",
            Self::Io { .. } => "GOVERNOR_IO",
            Self::Cancelled => "GOVERNOR_CANCELLED",
        }
    }
}
