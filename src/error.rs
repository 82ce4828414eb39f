//! Error types for odata-bind operations.

use thiserror::Error;

use crate::binder::BindError;

/// Result type alias using [`ODataError`].
pub type Result<T> = std::result::Result<T, ODataError>;

/// Error types for odata-bind operations.
#[derive(Debug, Error)]
pub enum ODataError {
    /// Semantic binding failure. The inner error carries the full
    /// taxonomy (scope, type-compatibility, resolution, structural, key).
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Model construction or lookup errors (duplicate type, dangling
    /// navigation target, etc.).
    #[error("Model error: {0}")]
    Model(String),
}
