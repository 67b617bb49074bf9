//! # entwine-gen
//!
//! Emits `ent` Go schema sources (`ent/schema/<snake_name>.go`) from a
//! [`SchemaRegistry`](entwine_schema::SchemaRegistry). External entities are
//! skipped; they are generated by the module that owns them.

pub mod error;
pub mod go;

pub use error::GenError;
pub use go::{GeneratedFile, GoEmitter, write_all};
