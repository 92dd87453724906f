use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

use crate::config::DEFAULT_CACHE_SECS;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub keys: usize,
    pub hits: u64,
    pub misses: u64,
}

/// In-process key-value store with per-entry expiry.
///
/// Owned by the serving layer and shared behind `&self`. Values are cloned
/// out, so callers never hold a reference into the map. Expired entries are
/// evicted when read and swept on every write, so keys that are never
/// requested again do not accumulate.
pub struct AnalysisCache<V> {
    entries: DashMap<String, Entry<V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    default_ttl: Duration,
}

impl<V: Clone> AnalysisCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let value = self.live_value(key);
        let counter = if value.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        value
    }

    pub fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let swept = self.purge_expired();
        if swept > 0 {
            tracing::debug!("Evicted {} expired cache entries", swept);
        }

        let expires_at = Instant::now() + ttl;
        self.entries.insert(key.to_string(), Entry { value, expires_at });
    }

    pub fn has(&self, key: &str) -> bool {
        self.live_value(key).is_some()
    }

    /// Returns whether an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drops every expired entry and returns how many went.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    /// Counts only live keys.
    pub fn stats(&self) -> CacheStats {
        self.purge_expired();
        CacheStats {
            keys: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn live_value(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Some(entry.value.clone());
            }
        }
        // Guard above is released; a racing writer's fresh value survives.
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        None
    }
}

impl<V: Clone> Default for AnalysisCache<V> {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_SECS))
    }
}

/// Cache key for one account's analysis.
pub fn analysis_cache_key(username: &str) -> String {
    format!("analysis:{}", username.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let cache = AnalysisCache::default();
        cache.set("analysis:octo", 42);
        assert_eq!(cache.get("analysis:octo"), Some(42));
        assert!(cache.has("analysis:octo"));
        assert_eq!(cache.get("analysis:other"), None);

        let stats = cache.stats();
        assert_eq!(stats, CacheStats { keys: 1, hits: 1, misses: 1 });
    }

    #[test]
    fn expired_entries_disappear() {
        let cache = AnalysisCache::new(Duration::from_secs(60));
        cache.set_with_ttl("gone", "value".to_string(), Duration::ZERO);
        cache.set("kept", "value".to_string());

        assert!(!cache.has("gone"));
        assert_eq!(cache.get("gone"), None);
        assert_eq!(cache.stats().keys, 1);
    }

    #[test]
    fn unread_expired_entries_are_evicted_by_writes() {
        let cache = AnalysisCache::new(Duration::ZERO);
        for i in 0..1000 {
            cache.set(&format!("analysis:user{}", i), i);
        }
        // Only the last write can still be in the map, and it is already stale.
        assert!(cache.entries.len() <= 1);
        assert_eq!(cache.stats().keys, 0);
    }

    #[test]
    fn writes_keep_live_entries() {
        let cache = AnalysisCache::new(Duration::from_secs(60));
        cache.set_with_ttl("stale", 0, Duration::ZERO);
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.entries.len(), 2);
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn purge_drops_expired() {
        let cache = AnalysisCache::new(Duration::from_secs(60));
        cache.set_with_ttl("a", 1, Duration::ZERO);
        cache.set_with_ttl("b", 2, Duration::ZERO);
        assert!(cache.purge_expired() >= 1);
        assert_eq!(cache.entries.len(), 0);
    }

    #[test]
    fn delete_and_clear() {
        let cache = AnalysisCache::default();
        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        cache.clear();
        assert!(!cache.has("b"));
    }

    #[test]
    fn keys_are_lowercased() {
        assert_eq!(analysis_cache_key("OctoCat"), "analysis:octocat");
    }
}
