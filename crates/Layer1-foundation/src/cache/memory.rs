//! Default in-memory KV cache
//!
//! Thread-safe map with per-entry expiry metadata. Expired entries stay
//! readable until [`MemoryCache::purge_expired`] runs; the repository refreshes
//! every key's expiry on each remote update.

use super::config::MemoryCacheConfig;
use super::{CacheFactory, KvCache};
use crate::value::ConfigValue;
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug)]
struct MemoryEntry {
    value: ConfigValue,
    created_at: Instant,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-memory cache for one namespace
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, MemoryEntry>>,
    config: MemoryCacheConfig,
}

impl MemoryCache {
    /// Create an unbounded cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache with configuration
    pub fn with_config(config: MemoryCacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Expiry deadline of a key (None if absent or never expiring)
    pub fn expires_at(&self, key: &str) -> Option<Instant> {
        self.entries.read().get(key).and_then(|e| e.expires_at)
    }

    /// Time since the key was first inserted
    pub fn age(&self, key: &str) -> Option<Duration> {
        self.entries.read().get(key).map(|e| e.created_at.elapsed())
    }

    /// Remove expired entries, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        let purged = before - entries.len();
        if purged > 0 {
            trace!(purged, remaining = entries.len(), "Purged expired cache entries");
        }
        purged
    }

    /// Capacity (0 = unbounded)
    pub fn capacity(&self) -> usize {
        self.config.max_entries
    }

    /// Deadline for a new write. A TTL past the clock's range never expires.
    fn expiry_for(&self, expire_seconds: u64) -> Option<Instant> {
        let ttl = match expire_seconds {
            0 => self.config.default_expire()?,
            secs => Duration::from_secs(secs),
        };
        Instant::now().checked_add(ttl)
    }
}

impl KvCache for MemoryCache {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.entries.read().get(key).map(|e| e.value.clone())
    }

    fn set(&self, key: &str, value: ConfigValue, expire_seconds: u64) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidInput("cache key must not be empty".to_string()));
        }

        let expires_at = self.expiry_for(expire_seconds);
        let mut entries = self.entries.write();

        // Existing key: replace value, keep creation time
        if let Some(entry) = entries.get_mut(key) {
            entry.value = value;
            entry.expires_at = expires_at;
            return Ok(());
        }

        if self.config.max_entries > 0 && entries.len() >= self.config.max_entries {
            return Err(Error::CacheFull {
                capacity: self.config.max_entries,
            });
        }

        entries.insert(
            key.to_string(),
            MemoryEntry {
                value,
                created_at: Instant::now(),
                expires_at,
            },
        );
        Ok(())
    }

    fn del(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    fn range(&self, visit: &mut dyn FnMut(&str, &ConfigValue) -> bool) {
        let entries = self.entries.read();
        for (key, entry) in entries.iter() {
            if !visit(key, &entry.value) {
                break;
            }
        }
    }

    fn entry_count(&self) -> usize {
        self.entries.read().len()
    }
}

/// Factory producing independent [`MemoryCache`] instances
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheFactory {
    config: MemoryCacheConfig,
}

impl MemoryCacheFactory {
    pub fn new(config: MemoryCacheConfig) -> Self {
        Self { config }
    }
}

impl CacheFactory for MemoryCacheFactory {
    fn create(&self) -> Result<Arc<dyn KvCache>> {
        Ok(Arc::new(MemoryCache::with_config(self.config.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_basic() {
        let cache = MemoryCache::new();

        cache.set("a", "1".into(), 0).unwrap();
        cache.set("b", "2".into(), 0).unwrap();

        assert_eq!(cache.get("a"), Some(ConfigValue::from("1")));
        assert_eq!(cache.entry_count(), 2);
        assert!(cache.del("a"));
        assert!(!cache.del("a"));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_update_keeps_entry_count() {
        let cache = MemoryCache::new();

        cache.set("a", "1".into(), 0).unwrap();
        cache.set("a", "10".into(), 0).unwrap();

        assert_eq!(cache.get("a"), Some(ConfigValue::from("10")));
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_capacity_rejection() {
        let cache = MemoryCache::with_config(MemoryCacheConfig::with_entries(1));

        cache.set("a", "1".into(), 0).unwrap();
        let err = cache.set("b", "2".into(), 0).unwrap_err();
        assert!(matches!(err, Error::CacheFull { capacity: 1 }));

        // Overwriting an existing key is still allowed
        cache.set("a", "2".into(), 0).unwrap();
        assert_eq!(cache.get("a"), Some(ConfigValue::from("2")));
    }

    #[test]
    fn test_empty_key_rejected() {
        let cache = MemoryCache::new();
        assert!(cache.set("", "x".into(), 0).is_err());
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_expiry_refresh_and_purge() {
        let cache = MemoryCache::new();

        cache.set("never", "x".into(), 0).unwrap();
        assert!(cache.expires_at("never").is_none());

        cache.set("soon", "x".into(), 120).unwrap();
        let first = cache.expires_at("soon").unwrap();
        std::thread::sleep(Duration::from_millis(5));
        cache.set("soon", "x".into(), 120).unwrap();
        let second = cache.expires_at("soon").unwrap();
        assert!(second > first);

        // Nothing has expired yet
        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.entry_count(), 2);
    }

    #[test]
    fn test_huge_expiry_never_expires() {
        let cache = MemoryCache::new();

        cache.set("k", "v".into(), u64::MAX).unwrap();
        assert_eq!(cache.get("k"), Some(ConfigValue::from("v")));
        assert!(cache.expires_at("k").is_none());
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn test_range_stops_early() {
        let cache = MemoryCache::new();
        for key in ["a", "b", "c"] {
            cache.set(key, key.into(), 0).unwrap();
        }

        let mut visited = 0;
        cache.range(&mut |_, _| {
            visited += 1;
            false
        });
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_factory_creates_independent_caches() {
        let factory = MemoryCacheFactory::default();
        let a = factory.create().unwrap();
        let b = factory.create().unwrap();

        a.set("k", "v".into(), 0).unwrap();
        assert_eq!(b.entry_count(), 0);
    }
}
