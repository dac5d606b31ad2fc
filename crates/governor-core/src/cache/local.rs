//! In-memory response cache

use super::key::CacheKey;
use serde::Serialize;
use std::collections::HashMap;

/// Hit/miss counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatistics {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Unbounded prompt-to-answer cache
#[derive(Debug, Default)]
pub struct LocalCache {
    entries: HashMap<CacheKey, String>,
    hits: u64,
    misses: u64,
}

impl LocalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an answer, counting the hit or miss
    pub fn get(&mut self, key: &CacheKey) -> Option<String> {
        match self.entries.get(key) {
            Some(text) => {
                self.hits += 1;
                Some(text.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn set(&mut self, key: CacheKey, text: impl Into<String>) {
        self.entries.insert(key, text.into());
    }

    /// Presence check; does not affect statistics
    pub fn has(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut cache = LocalCache::new();
        let key = CacheKey::for_prompt("What is Python?");

        assert!(!cache.has(&key));
        cache.set(key.clone(), "A programming language.");

        assert!(cache.has(&key));
        assert_eq!(cache.get(&key).as_deref(), Some("A programming language."));
    }

    #[test]
    fn test_overwrite() {
        let mut cache = LocalCache::new();
        let key = CacheKey::for_prompt("q");
        cache.set(key.clone(), "first");
        cache.set(key.clone(), "second");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).as_deref(), Some("second"));
    }

    #[test]
    fn test_statistics() {
        let mut cache = LocalCache::new();
        let present = CacheKey::for_prompt("present");
        let absent = CacheKey::for_prompt("absent");
        cache.set(present.clone(), "yes");

        cache.get(&present);
        cache.get(&present);
        cache.get(&absent);
        cache.has(&absent);

        assert_eq!(
            cache.statistics(),
            CacheStatistics {
                entries: 1,
                hits: 2,
                misses: 1,
            }
        );
    }
}
