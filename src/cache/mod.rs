//! Content cache
//!
//! An explicit cache service injected into the loaders. Entries live for the
//! lifetime of the process and are only dropped by `invalidate` or `clear`;
//! callers must invalidate after an out-of-band edit to see fresh content.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Represents a cached value
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    /// When the value was written
    pub stored_at: DateTime<Utc>,
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Get summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{} entries, {} hits, {} misses",
            self.entries, self.hits, self.misses
        )
    }
}

/// Process-wide content cache keyed by page identity
#[derive(Debug)]
pub struct ContentCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> Default for ContentCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<K, V> ContentCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value, counting the hit or miss
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Look up the full entry without touching the counters
    pub fn entry(&self, key: &K) -> Option<CacheEntry<V>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    /// Store a value, replacing any previous one
    pub fn set(&self, key: K, value: V) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Utc::now(),
            },
        );
    }

    /// Drop one entry, returning whether it existed
    pub fn invalidate(&self, key: &K) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key).is_some()
    }

    /// Drop every entry, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let count = entries.len();
        entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_invalidate() {
        let cache: ContentCache<String, u32> = ContentCache::new();
        assert_eq!(cache.get(&"/about/".to_string()), None);

        cache.set("/about/".to_string(), 1);
        assert_eq!(cache.get(&"/about/".to_string()), Some(1));

        assert!(cache.invalidate(&"/about/".to_string()));
        assert!(!cache.invalidate(&"/about/".to_string()));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_replaces() {
        let cache: ContentCache<&str, &str> = ContentCache::new();
        cache.set("home", "old");
        cache.set("home", "new");
        assert_eq!(cache.get(&"home"), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_and_stats() {
        let cache: ContentCache<&str, u8> = ContentCache::new();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.get(&"a");
        cache.get(&"zzz");

        let stats = cache.stats();
        assert_eq!(stats, CacheStats { entries: 2, hits: 1, misses: 1 });
        assert_eq!(stats.summary(), "2 entries, 1 hits, 1 misses");

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entry_records_time() {
        let cache: ContentCache<&str, u8> = ContentCache::new();
        let before = Utc::now();
        cache.set("a", 1);
        let entry = cache.entry(&"a").unwrap();
        assert!(entry.stored_at >= before);
        // entry() does not count as a hit
        assert_eq!(cache.stats().hits, 0);
    }
}
