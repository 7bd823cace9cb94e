//! Keyed cache for loaded filter choice lists
//!
//! Provides a `CacheProvider` trait and an in-memory implementation. Entries
//! live until they are invalidated explicitly, or until an optional TTL
//! passes.

mod config;
mod memory;

pub use config::*;
pub use memory::*;

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

/// A cached option list with metadata about when it was stored and when, if
/// ever, it expires.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedValue {
    pub options: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// `None` keeps the entry until it is removed.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedValue {
    /// Creates an entry that never expires.
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Creates an entry expiring `ttl` from now. `None` never expires.
    pub fn with_ttl(options: Vec<String>, ttl: Option<Duration>) -> Self {
        let now = Utc::now();
        let expires_at = ttl.map(|ttl| {
            now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero())
        });
        Self {
            options,
            created_at: now,
            expires_at,
        }
    }

    /// Returns `true` if this entry has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }
}

/// Trait for option list caches.
///
/// Implementations must never return expired values from `get()`. Writes to
/// the same key are not coordinated: the last `set` wins.
///
/// # Example
///
/// ```ignore
/// use datagrid_lib::cache::{CacheProvider, CachedValue, InMemoryCache};
///
/// let cache = InMemoryCache::new();
/// cache.set("status", CachedValue::new(vec!["Paid".into()])).await;
///
/// if let Some(cached) = cache.get("status").await {
///     println!("Got: {:?}", cached.options);
/// }
/// ```
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// Returns `None` if the key doesn't exist or the value has expired.
    async fn get(&self, key: &str) -> Option<CachedValue>;

    async fn set(&self, key: &str, value: CachedValue);

    async fn remove(&self, key: &str);

    async fn clear(&self);

    /// Removes all expired entries, returning how many were removed.
    async fn gc(&self) -> usize;
}
