//! Asynchronously loaded filter choice lists
//!
//! A filter may declare a loader producing its choices. [`AsyncOptions`]
//! runs the loader on demand, caches the result by key, and keeps the last
//! good list when a load fails.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::cache::{CacheConfig, CacheProvider, CachedValue, InMemoryCache};
use crate::error::OptionsError;
use crate::query::filter::FilterSpec;

pub type OptionsFuture = BoxFuture<'static, Result<Vec<String>, OptionsError>>;

/// Produces a fresh choice list.
pub type OptionsLoader = Arc<dyn Fn() -> OptionsFuture + Send + Sync>;

/// Wrap an async closure as an [`OptionsLoader`].
pub fn loader<F, Fut>(f: F) -> OptionsLoader
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<String>, OptionsError>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Where a list is in its load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(OptionsError),
}

#[derive(Debug, Default)]
struct OptionsState {
    options: Vec<String>,
    load: LoadState,
}

/// Choice list of one filter, backed by a shared cache.
///
/// Clones share state. Concurrent loads of the same key are not coalesced;
/// whichever finishes last is what the cache holds.
#[derive(Clone)]
pub struct AsyncOptions {
    loader: Option<OptionsLoader>,
    cache: Arc<dyn CacheProvider>,
    config: CacheConfig,
    cache_key: Option<String>,
    state: Arc<RwLock<OptionsState>>,
}

impl AsyncOptions {
    /// Options with no loader, backed by a private in-memory cache.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(InMemoryCache::new()))
    }

    pub fn with_cache(cache: Arc<dyn CacheProvider>) -> Self {
        Self {
            loader: None,
            cache,
            config: CacheConfig::default(),
            cache_key: None,
            state: Arc::new(RwLock::new(OptionsState::default())),
        }
    }

    /// Options for a column filter: its static choices, loader and cache key.
    pub fn for_filter(spec: &FilterSpec, cache: Arc<dyn CacheProvider>) -> Self {
        let mut options = Self::with_cache(cache).with_initial(spec.options.clone());
        options.loader = spec.options_loader.clone();
        options.cache_key = spec.cache_key.clone();
        options
    }

    pub fn with_loader(mut self, loader: OptionsLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Choices shown before any load, typically derived from column data.
    pub fn with_initial(self, options: Vec<String>) -> Self {
        if let Ok(mut state) = self.state.try_write() {
            state.options = options;
        }
        self
    }

    pub fn cache_key(&self) -> &str {
        self.config.key_for(self.cache_key.as_deref())
    }

    pub async fn options(&self) -> Vec<String> {
        self.state.read().await.options.clone()
    }

    pub async fn state(&self) -> LoadState {
        self.state.read().await.load.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.load == LoadState::Loading
    }

    /// Load the list, from cache unless `force_refresh`.
    ///
    /// Never fails: a loader error is logged and the previous list is kept.
    /// Without a loader the current list is returned unchanged.
    pub async fn load(&self, force_refresh: bool) -> Vec<String> {
        match self.try_load(force_refresh).await {
            Ok(options) => options,
            Err(OptionsError::MissingLoader { .. }) => self.options().await,
            Err(e) => {
                log::error!("Failed to load async filter options: {e}");
                self.options().await
            }
        }
    }

    /// Like [`load`](Self::load), but reports the failure.
    pub async fn try_load(&self, force_refresh: bool) -> Result<Vec<String>, OptionsError> {
        let key = self.cache_key().to_string();
        let loader = self
            .loader
            .clone()
            .ok_or_else(|| OptionsError::missing_loader(&key))?;

        if !force_refresh && let Some(cached) = self.cache.get(&key).await {
            log::debug!("Options cache hit for '{key}'");
            let mut state = self.state.write().await;
            state.options = cached.options.clone();
            state.load = LoadState::Ready;
            return Ok(cached.options);
        }

        self.state.write().await.load = LoadState::Loading;
        let result = loader().await;

        let mut state = self.state.write().await;
        match result {
            Ok(options) => {
                self.cache
                    .set(&key, CachedValue::with_ttl(options.clone(), self.config.ttl))
                    .await;
                log::debug!("Loaded {} option(s) for '{key}'", options.len());
                state.options = options.clone();
                state.load = LoadState::Ready;
                Ok(options)
            }
            Err(e) => {
                state.load = LoadState::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// Drop this list's cache entry so the next load calls the loader.
    pub async fn clear_cache(&self) {
        self.cache.remove(self.cache_key()).await;
    }
}

impl Default for AsyncOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AsyncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOptions")
            .field("has_loader", &self.loader.is_some())
            .field("cache_key", &self.cache_key())
            .finish()
    }
}
