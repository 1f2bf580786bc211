//! In-process cache backed by a `HashMap`.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;

use super::types::{is_valid, CacheEntry};
use super::{CacheStore, Sweep};
use crate::metrics::CACHE_LOOKUPS;

/// In-memory TTL cache.
///
/// Locks are never held across await points, so a std `RwLock` is enough.
#[derive(Debug)]
pub struct MemoryCache<K, V> {
    name: String,
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty cache. `name` labels metrics and sweep logs.
    pub fn new(name: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn insert(&self, key: K, entry: CacheEntry<V>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }
}

impl<K, V> CacheStore<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let hit = entries
            .get(key)
            .filter(|entry| is_valid(entry, self.ttl, Utc::now()))
            .map(|entry| entry.value.clone());

        let result = if hit.is_some() { "hit" } else { "miss" };
        CACHE_LOOKUPS
            .with_label_values(&[self.name.as_str(), result])
            .inc();
        hit
    }

    fn set(&self, key: K, value: V) {
        self.insert(key, CacheEntry::new(value));
    }

    fn set_expired(&self, key: K, value: V) {
        self.insert(key, CacheEntry::expired(value));
    }

    fn remove(&self, key: &K) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<K, V> Sweep for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| is_valid(entry, self.ttl, now));
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let cache: MemoryCache<String, u32> = MemoryCache::new("test", Duration::from_secs(60));
        cache.set("a".to_string(), 1);

        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.get(&"b".to_string()), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_expired_reads_as_absent_but_is_stored() {
        let cache: MemoryCache<&str, Vec<String>> =
            MemoryCache::new("test", Duration::from_secs(3600));
        cache.set_expired("empty", Vec::new());

        assert_eq!(cache.get(&"empty"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_expired_with_fresh_value() {
        let cache: MemoryCache<&str, u32> = MemoryCache::new("test", Duration::from_secs(3600));
        cache.set_expired("k", 0);
        cache.set("k", 7);

        assert_eq!(cache.get(&"k"), Some(7));
    }

    #[test]
    fn test_sweep_removes_only_expired_entries() {
        let cache: MemoryCache<&str, u32> = MemoryCache::new("test", Duration::from_secs(3600));
        cache.set("fresh", 1);
        cache.set_expired("stale-1", 2);
        cache.set_expired("stale-2", 3);

        assert_eq!(cache.sweep(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"fresh"), Some(1));
        assert_eq!(cache.sweep(), 0);
    }

    #[test]
    fn test_remove() {
        let cache: MemoryCache<&str, u32> = MemoryCache::new("test", Duration::from_secs(60));
        cache.set("k", 1);
        cache.remove(&"k");

        assert!(cache.is_empty());
    }
}
