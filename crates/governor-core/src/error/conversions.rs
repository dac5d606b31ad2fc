//! From trait implementations for GovernorError conversions

use super::types::GovernorError;

impl From<std::io::Error> for GovernorError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for GovernorError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

/// The request URL is stripped so that credentials never reach error text
impl From<reqwest::Error> for GovernorError {
    fn from(error: reqwest::Error) -> Self {
        let error = error.without_url();
        Self::Http {
            message: error.to_string(),
            status_code: error.status().map(|s| s.as_u16()),
        }
    }
}
