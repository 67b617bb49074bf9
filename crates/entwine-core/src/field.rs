//! Field descriptors and their declaration builders.
//!
//! ```
//! use entwine_core::field;
//!
//! let admin = field::boolean("admin").default(false).build().unwrap();
//! assert!(admin.default.is_some());
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::naming::is_identifier;
use crate::types::{DefaultValue, FieldType};

/// A typed field of an entity, with its modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Nullable. An unset optional field is stored as null.
    #[serde(default, skip_serializing_if = "crate::is_false")]
    pub optional: bool,

    /// Identity-bearing: values are unique across records of the entity.
    #[serde(default, skip_serializing_if = "crate::is_false")]
    pub unique: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FieldDescriptor {
    /// Check the field name.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyName` or `CoreError::InvalidName`.
    pub fn check(&self) -> Result<(), CoreError> {
        check_name("field", &self.name)
    }

    /// Whether records may omit this field (nullable or defaulted).
    #[must_use]
    pub const fn is_omittable(&self) -> bool {
        self.optional || self.default.is_some()
    }
}

pub(crate) fn check_name(kind: &'static str, name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::EmptyName { kind });
    }
    if !is_identifier(name) {
        return Err(CoreError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Builder returned by the `field::*` constructors.
#[derive(Debug, Clone)]
#[must_use]
pub struct FieldBuilder {
    descriptor: FieldDescriptor,
}

impl FieldBuilder {
    fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            descriptor: FieldDescriptor {
                name: name.into(),
                field_type,
                optional: false,
                unique: false,
                default: None,
                comment: None,
            },
        }
    }

    /// Mark the field nullable.
    pub const fn optional(mut self) -> Self {
        self.descriptor.optional = true;
        self
    }

    /// Mark the field unique (identity-bearing).
    pub const fn unique(mut self) -> Self {
        self.descriptor.unique = true;
        self
    }

    /// Set the value used when the field is unset.
    pub fn default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.descriptor.default = Some(value.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.descriptor.comment = Some(comment.into());
        self
    }

    /// Set the members of an enum field. Ignored for other field types.
    pub fn values<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let FieldType::Enum { values } = &mut self.descriptor.field_type {
            *values = members.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Validate the name and return the descriptor.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyName` if the name is empty, or
    /// `CoreError::InvalidName` if it is not an identifier.
    pub fn build(self) -> Result<FieldDescriptor, CoreError> {
        self.descriptor.check()?;
        Ok(self.descriptor)
    }
}

pub fn string(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name, FieldType::String)
}

pub fn boolean(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name, FieldType::Bool)
}

pub fn int(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name, FieldType::Int)
}

pub fn float(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name, FieldType::Float)
}

pub fn time(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name, FieldType::Time)
}

/// Declare an enum field. Without a `values(..)` call the enum is left
/// unresolved and registry validation reports it.
pub fn enumeration(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name, FieldType::Enum { values: Vec::new() })
}
