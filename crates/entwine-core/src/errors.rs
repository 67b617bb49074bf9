//! Cross-cutting error types for entwine.
//!
//! Declaration failures surface here. Registry-level failures (dangling edges,
//! duplicate entities) are defined in `entwine-schema`, and the CLI converges
//! everything through `anyhow`.

use thiserror::Error;

/// Errors raised while declaring fields, edges, and entities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A field, edge, entity, or edge target was declared with an empty name.
    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    /// A name is not a valid identifier (letters, digits, underscores).
    #[error("Invalid {kind} name: {name:?}")]
    InvalidName { kind: &'static str, name: String },

    /// Two fields of one entity share a name.
    #[error("Duplicate field {field} on entity {entity}")]
    DuplicateField { entity: String, field: String },

    /// Two edges of one entity share a name.
    #[error("Duplicate edge {edge} on entity {entity}")]
    DuplicateEdge { entity: String, edge: String },
}
