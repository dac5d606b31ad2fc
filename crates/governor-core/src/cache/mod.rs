//! Response memoization
//!
//! Answers are keyed by a digest of the normalized prompt, so the same question
//! asked twice costs one provider call. Entries never expire and the cache is
//! unbounded; a process that sees an unbounded stream of distinct prompts will
//! grow it without limit.

mod key;
mod local;

pub use key::{CacheKey, normalize_prompt};
pub use local::{CacheStatistics, LocalCache};
