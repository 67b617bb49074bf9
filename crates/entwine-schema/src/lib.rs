//! # entwine-schema
//!
//! The schema registry: an immutable set of entity descriptors, built once and
//! handed by reference to whatever consumes it.
//!
//! - [`SchemaRegistry::builder`] enforces the construction contracts (unique
//!   entity names, no dangling edge targets).
//! - [`SchemaRegistry::validate`] reports well-formedness violations.
//! - [`SchemaBundle`] is the compiler form, encoded as JSON or TOML.
//! - [`SchemaRegistry::json_schema`] and [`SchemaRegistry::validate_record`]
//!   check concrete JSON records against an entity.
//! - [`community_schema`] declares the built-in data model.
//!
//! ```
//! use entwine_schema::{community_schema, validation::Rule};
//!
//! let mut registry = community_schema().expect("built-in schema");
//! let report = registry.validate();
//! assert_eq!(report.by_rule(Rule::UnresolvedEnum).count(), 2);
//!
//! let roles = vec!["member".to_string(), "owner".to_string()];
//! let plans = vec!["free".to_string(), "pro".to_string()];
//! registry.resolve_enum("User", "role", &roles).expect("role");
//! registry.resolve_enum("Subscription", "plan", &plans).expect("plan");
//! assert!(registry.validate().is_valid());
//! ```

pub mod bundle;
pub mod community;
pub mod error;
pub mod record;
pub mod registry;
pub mod relations;
pub mod validation;

pub use bundle::{BUNDLE_VERSION, BundleFormat, SchemaBundle};
pub use community::community_schema;
pub use error::SchemaError;
pub use registry::{RegistryBuilder, SchemaRegistry};
pub use relations::Relation;
pub use validation::{Rule, Severity, ValidationReport, Violation};
