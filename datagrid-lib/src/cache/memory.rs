//! In-memory cache implementation using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::CacheProvider;
use super::CachedValue;

/// An in-memory option cache backed by a concurrent hash map.
///
/// Share one instance (behind an `Arc`) between every filter of a table, or
/// between tables, to reuse loaded lists.
///
/// # Example
///
/// ```
/// use datagrid_lib::cache::InMemoryCache;
///
/// let cache = InMemoryCache::new();
/// assert!(cache.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCache {
    store: DashMap<String, CachedValue>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of entries (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.get(key).is_some_and(|entry| !entry.is_expired())
    }
}

#[async_trait]
impl CacheProvider for InMemoryCache {
    async fn get(&self, key: &str) -> Option<CachedValue> {
        let entry = self.store.get(key)?;
        let value = entry.value();

        if value.is_expired() {
            drop(entry);
            self.store.remove(key);
            None
        } else {
            Some(value.clone())
        }
    }

    async fn set(&self, key: &str, value: CachedValue) {
        self.store.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.store.remove(key);
    }

    async fn clear(&self) {
        self.store.clear();
    }

    async fn gc(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, value| !value.is_expired());
        before - self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let cache = InMemoryCache::new();
        cache.set("k", CachedValue::new(vec!["x".into()])).await;
        assert_eq!(
            cache.get("k").await.map(|v| v.options),
            Some(vec!["x".to_string()])
        );

        cache.remove("k").await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_hidden_and_collected() {
        let cache = InMemoryCache::new();
        cache
            .set("old", CachedValue::with_ttl(vec![], Some(Duration::ZERO)))
            .await;
        cache.set("new", CachedValue::new(vec![])).await;

        assert!(!cache.contains("old"));
        assert_eq!(cache.gc().await, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("old").await.is_none());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = InMemoryCache::new();
        cache.set("k", CachedValue::new(vec!["first".into()])).await;
        cache.set("k", CachedValue::new(vec!["second".into()])).await;
        assert_eq!(
            cache.get("k").await.map(|v| v.options),
            Some(vec!["second".to_string()])
        );
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryCache::new();
        cache.set("a", CachedValue::new(vec![])).await;
        cache.set("b", CachedValue::new(vec![])).await;
        cache.clear().await;
        assert!(cache.is_empty());
    }
}
