//! Cache configuration

use std::time::Duration;

use serde::Deserialize;

/// Options cache settings.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use datagrid_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default().with_ttl(Duration::from_secs(300));
/// assert_eq!(config.default_key, "default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// How long a loaded list stays valid.
    ///
    /// Default: `None` (kept until invalidated)
    #[serde(with = "ttl_secs")]
    pub ttl: Option<Duration>,

    /// Key used when a filter declares no `cacheKey`.
    ///
    /// Default: `"default"`
    pub default_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: None,
            default_key: "default".to_string(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = key.into();
        self
    }

    /// Resolves an optional per-filter key.
    pub fn key_for<'a>(&'a self, key: Option<&'a str>) -> &'a str {
        key.unwrap_or(&self.default_key)
    }
}

mod ttl_secs {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(de)?.map(Duration::from_secs))
    }
}
