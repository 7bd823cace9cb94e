//! Async options loader errors

/// Errors raised while loading filter choice lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    /// The loader itself failed.
    #[error("Options loader failed: {0}")]
    Loader(String),

    /// No loader was configured for this source.
    #[error("No options loader configured for '{key}'")]
    MissingLoader { key: String },
}

impl OptionsError {
    pub fn loader(message: impl Into<String>) -> Self {
        Self::Loader(message.into())
    }

    pub fn missing_loader(key: impl Into<String>) -> Self {
        Self::MissingLoader { key: key.into() }
    }
}
