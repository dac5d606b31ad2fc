//! Cache key derivation

use sha2::{Digest, Sha256};
use std::fmt;

/// Content-derived cache key
///
/// SHA-256 of the normalized prompt. Two prompts that differ only in leading,
/// trailing or repeated whitespace share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a prompt
    pub fn for_prompt(prompt: &str) -> Self {
        let normalized = normalize_prompt(prompt);
        Self(format!("{:x}", Sha256::digest(normalized.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trim the prompt and collapse every whitespace run into a single space
pub fn normalize_prompt(prompt: &str) -> String {
    prompt.split_whitespace().collect::<Vec<_>>().join(" ")
}
