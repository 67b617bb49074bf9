//! Schema registry error types.

use entwine_core::CoreError;
use thiserror::Error;

/// Errors from the schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested entity was not found in the registry.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Requested field was not found on the entity.
    #[error("Field not found: {entity}.{field}")]
    UnknownField { entity: String, field: String },

    /// Enum members were supplied for a field that is not an enum.
    #[error("Field {entity}.{field} is not an enum")]
    NotAnEnum { entity: String, field: String },

    /// Two entities share a name.
    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    /// An edge targets an entity that is not declared in the registry.
    #[error("Edge {entity}.{edge} targets undeclared entity {target}")]
    DanglingEdge {
        entity: String,
        edge: String,
        target: String,
    },

    /// JSON value did not pass record validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// Individual error messages from the validator.
        errors: Vec<String>,
    },

    /// A derived JSON Schema could not be compiled.
    #[error("Schema generation error: {0}")]
    Generation(String),

    /// Encoding the compiler form failed.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Decoding the compiler form failed.
    #[error("Decode error: {0}")]
    Decode(String),

    /// File extension does not map to a known compiler-form encoding.
    #[error("Unsupported schema format: {0}")]
    UnsupportedFormat(String),

    /// A descriptor failed its declaration checks.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
