//! Semantic field types and default values.
//!
//! Field types serialize as a tagged object (`{"kind": "enum", "values": [...]}`)
//! so the enum member list travels with the type. Default values are untagged
//! scalars and are checked against the declared type by registry validation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Semantic type of an entity field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Bool,
    Int,
    Float,
    Time,
    /// A closed set of named values. An empty member list is the unresolved
    /// placeholder state and fails validation.
    Enum {
        #[serde(default)]
        values: Vec<String>,
    },
}

impl FieldType {
    /// Return the lowercase type name used in reports and the compiler form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Time => "time",
            Self::Enum { .. } => "enum",
        }
    }

    /// Enum members, or `None` for non-enum types.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            Self::Enum { values } => Some(values),
            _ => None,
        }
    }

    /// Whether this is an enum with no declared members.
    #[must_use]
    pub fn is_unresolved_enum(&self) -> bool {
        matches!(self, Self::Enum { values } if values.is_empty())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum { values } if !values.is_empty() => {
                write!(f, "enum[{}]", values.join(", "))
            }
            other => f.write_str(other.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// DefaultValue
// ---------------------------------------------------------------------------

/// Fallback value applied when a field is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl DefaultValue {
    /// Name of the value's own type, for mismatch messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Check whether this default can populate a field of `field_type`.
    ///
    /// Integers are accepted for float fields. String defaults on an enum must
    /// name a member; while the enum is unresolved no member check is possible
    /// and the default is accepted. Time fields take no literal default.
    #[must_use]
    pub fn fits(&self, field_type: &FieldType) -> bool {
        match (self, field_type) {
            (Self::Bool(_), FieldType::Bool)
            | (Self::Int(_), FieldType::Int | FieldType::Float)
            | (Self::Float(_), FieldType::Float)
            | (Self::String(_), FieldType::String) => true,
            (Self::String(value), FieldType::Enum { values }) => {
                values.is_empty() || values.contains(value)
            }
            _ => false,
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::String(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
