//! Error types for the listable crate.

use thiserror::Error;

/// Boxed error returned by filter and sort overrides.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when configuring a list or assembling a result.
///
/// A row that fails to match a filter (wrong type, missing field, bad range
/// bound) is never an error; it is simply excluded from the result.
#[derive(Debug, Error)]
pub enum ListableError {
    /// Page size must be at least one.
    #[error("invalid limit {0}: page size must be at least 1")]
    InvalidLimit(usize),

    /// Requested page size exceeds the configured maximum.
    #[error("limit {limit} exceeds the maximum page size of {max}")]
    LimitTooLarge { limit: usize, max: usize },

    /// A repository was built without a dataset.
    #[error("repository requires a `data` option")]
    MissingData,

    /// A request parameter could not be interpreted.
    #[error("invalid value '{value}' for parameter '{name}'")]
    InvalidParam { name: String, value: String },

    /// YAML list configuration could not be deserialized.
    #[error("invalid list configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON list configuration could not be deserialized.
    #[error("invalid list configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Error raised by a caller-supplied filter or sort override.
    #[error(transparent)]
    Override(BoxError),
}

/// Result type for listable operations.
pub type Result<T> = std::result::Result<T, ListableError>;
