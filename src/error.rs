//! Error types for criteria construction and query compilation.

use thiserror::Error;

/// Result type alias using [`OqlError`].
pub type Result<T> = std::result::Result<T, OqlError>;

/// Error types for oqlkit operations.
///
/// Everything except [`OqlError::Engine`] and the document loading variants is
/// a caller error: the criteria tree or its arguments must be fixed, retrying
/// cannot help.
#[derive(Debug, Error)]
pub enum OqlError {
    // ==================== Malformed criteria trees ====================
    /// Blank property name, or a property the entity schema does not declare.
    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    /// Binding that cannot be rendered (arity, empty word set, null misuse).
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),

    /// Projection that cannot be rendered.
    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    // ==================== Invalid arguments ====================
    /// Target type that is not a valid entity type.
    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    /// Missing list element, unknown operator name, bad alias.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Schema registration errors (duplicate entity, unknown entity).
    #[error("Schema error: {0}")]
    SchemaError(String),

    // ==================== Collaborators ====================
    /// Failure reported by, or about the output of, a query engine.
    #[error("Engine error: {0}")]
    Engine(String),

    /// Criteria or config document could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Criteria or config document could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
