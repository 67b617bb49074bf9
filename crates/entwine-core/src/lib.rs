//! # entwine-core
//!
//! Descriptor types for declaring entwine schemas.
//!
//! This crate provides the building blocks every other entwine crate shares:
//! - `FieldDescriptor` and the `field::*` declaration builders
//! - `EdgeDescriptor` and the `edge::to` / `edge::from` builders
//! - `EntityDescriptor` with per-entity structural checks
//! - Naming helpers used when emitting generator input
//! - Cross-cutting error types
//!
//! Descriptors are plain data. They derive `Serialize`, `Deserialize`, and
//! `JsonSchema` so a registry can be handed to an external schema compiler
//! and read back without loss.

pub mod edge;
pub mod entity;
pub mod errors;
pub mod field;
pub mod naming;
pub mod types;

pub use edge::{Cardinality, EdgeDescriptor, EdgeDirection};
pub use entity::EntityDescriptor;
pub use errors::CoreError;
pub use field::FieldDescriptor;
pub use types::{DefaultValue, FieldType};

/// `skip_serializing_if` helper for flags that default to `false`.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) const fn is_false(value: &bool) -> bool {
    !*value
}
