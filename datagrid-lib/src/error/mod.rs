//! Error types

mod options;
mod validation;

pub use options::*;
pub use validation::*;

/// Top-level error for fallible setup calls.
///
/// Pipeline operations never fail; this covers configuration loading and
/// the async options loader.
#[derive(Debug, thiserror::Error)]
pub enum DatagridError {
    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Options loader or cache failure.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// Column definitions failed validation.
    #[error("{} column validation error(s): {}", .0.len(), join(.0))]
    Validation(Vec<ColumnValidationError>),
}

fn join(errors: &[ColumnValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
