//! Code generation error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// An enum field still has no members; there is nothing to pass to
    /// `.Values(...)`.
    #[error("Cannot emit {entity}.{field}: enum has no members")]
    UnresolvedEnum { entity: String, field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
