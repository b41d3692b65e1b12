//! TTL key-value cache backed by a concurrent map.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::trace;

use audithub_core::result::AppResult;

/// A single cached value with its absolute expiry.
///
/// An entry is visible to readers iff `now < expires_at`; expired entries
/// are logically absent even before the sweeper physically removes them.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Concurrent string-keyed cache with per-entry TTL.
///
/// Values are stored as JSON strings; typed access goes through
/// [`TtlCache::get_json`] and [`TtlCache::insert_json`]. Two racing
/// writers for the same key resolve last-write-wins, which is acceptable
/// because the cache is an optimization over an idempotent source of
/// truth, never the source itself.
#[derive(Debug)]
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    default_ttl: Duration,
}

impl TtlCache {
    /// Create a cache whose `insert_default` uses the given TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// The TTL applied by [`TtlCache::insert_default`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get a value by key. Returns `None` for absent or expired entries;
    /// an expired entry is removed on the way out.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            // The read guard must drop before the removal below; removing
            // while holding it would deadlock on the shard lock.
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Insert a value with an explicit TTL, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value: value.into(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Insert a value with the cache's default TTL.
    pub fn insert_default(&self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, value, self.default_ttl);
    }

    /// Remove an entry immediately, regardless of its TTL.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Remove every expired entry. Returns the number removed.
    ///
    /// Runs on a fixed interval from the background sweeper, independent
    /// of read traffic.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            trace!(removed, "Swept expired cache entries");
        }
        removed
    }

    /// Number of physically present entries, including not-yet-swept
    /// expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a typed value by deserializing from JSON.
    pub fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.get(key) {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    /// Insert a typed value by serializing to JSON.
    pub fn insert_json<T: serde::Serialize>(
        &self,
        key: impl Into<String>,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.insert(key, json, ttl);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cache() -> TtlCache {
        TtlCache::new(Duration::from_secs(60))
    }

    #[test]
    fn test_insert_get() {
        let cache = make_cache();
        cache.insert("key1", "value1", Duration::from_secs(60));
        assert_eq!(cache.get("key1"), Some("value1".to_string()));
    }

    #[test]
    fn test_expired_entry_is_absent_before_sweep() {
        let cache = make_cache();
        cache.insert("key1", "value1", Duration::from_secs(0));
        // No sweep has run; the read itself must treat the entry as gone.
        assert_eq!(cache.get("key1"), None);
    }

    #[test]
    fn test_invalidate() {
        let cache = make_cache();
        cache.insert("key1", "value1", Duration::from_secs(60));
        cache.invalidate("key1");
        assert_eq!(cache.get("key1"), None);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let cache = make_cache();
        cache.insert("dead", "v", Duration::from_secs(0));
        cache.insert("alive", "v", Duration::from_secs(60));
        let removed = cache.sweep();
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("alive"), Some("v".to_string()));
    }

    #[test]
    fn test_last_write_wins() {
        let cache = make_cache();
        cache.insert("key1", "first", Duration::from_secs(60));
        cache.insert("key1", "second", Duration::from_secs(60));
        assert_eq!(cache.get("key1"), Some("second".to_string()));
    }

    #[test]
    fn test_json_roundtrip() {
        let cache = make_cache();
        let data = serde_json::json!({"name": "test", "count": 42});
        cache
            .insert_json("json_key", &data, Duration::from_secs(60))
            .unwrap();
        let result: Option<serde_json::Value> = cache.get_json("json_key").unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    async fn test_concurrent_fills_do_not_corrupt() {
        let cache = std::sync::Arc::new(make_cache());
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = std::sync::Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache.insert("shared", format!("writer-{i}"), Duration::from_secs(60));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        // One of the writers won; the entry is intact.
        let value = cache.get("shared").unwrap();
        assert!(value.starts_with("writer-"));
    }
}
