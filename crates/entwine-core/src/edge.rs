//! Edge descriptors and their declaration builders.
//!
//! A relation between two entities is declared once. The owning side holds a
//! `to` edge; the other side may hold a `from` edge whose `ref` names the
//! owning edge, giving back-reference navigation without a second,
//! independently maintained forward edge.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;
use crate::field::check_name;

/// Which side of a relation an edge sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    /// Owning side.
    To,
    /// Back-reference to an owning `to` edge on the target.
    From,
}

impl EdgeDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::To => "to",
            Self::From => "from",
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many target records an edge reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

impl Cardinality {
    /// Infer cardinality from the plurality of an edge name: `posts` is many,
    /// `user` is one.
    ///
    /// Only a trailing `s` is considered, so singular names such as `status`
    /// or `alias` come out as many. Declare those with `.unique()`.
    #[must_use]
    pub fn infer(name: &str) -> Self {
        if name.len() > 1 && name.ends_with('s') && !name.ends_with("ss") {
            Self::Many
        } else {
            Self::One
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Many => "many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relationship from the declaring entity to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeDescriptor {
    pub name: String,
    pub target: String,
    pub direction: EdgeDirection,
    pub cardinality: Cardinality,

    /// For `from` edges: the name of the owning `to` edge on `target`.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,

    #[serde(default, skip_serializing_if = "crate::is_false")]
    pub required: bool,

    /// Foreign-key field on the declaring entity that stores the target id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl EdgeDescriptor {
    /// Check the edge and target names.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyName` or `CoreError::InvalidName`.
    pub fn check(&self) -> Result<(), CoreError> {
        check_name("edge", &self.name)?;
        check_name("edge target", &self.target)?;
        Ok(())
    }

    #[must_use]
    pub fn is_back_reference(&self) -> bool {
        self.direction == EdgeDirection::From
    }
}

/// Builder returned by [`to`] and [`from`].
#[derive(Debug, Clone)]
#[must_use]
pub struct EdgeBuilder {
    descriptor: EdgeDescriptor,
}

impl EdgeBuilder {
    fn new(name: String, target: String, direction: EdgeDirection) -> Self {
        let cardinality = Cardinality::infer(&name);
        Self {
            descriptor: EdgeDescriptor {
                name,
                target,
                direction,
                cardinality,
                inverse: None,
                required: false,
                field: None,
            },
        }
    }

    /// Force single-target cardinality.
    pub const fn unique(mut self) -> Self {
        self.descriptor.cardinality = Cardinality::One;
        self
    }

    /// Force multi-target cardinality.
    pub const fn many(mut self) -> Self {
        self.descriptor.cardinality = Cardinality::Many;
        self
    }

    /// Name the owning `to` edge on the target this back-reference mirrors.
    pub fn reference(mut self, owner_edge: impl Into<String>) -> Self {
        self.descriptor.inverse = Some(owner_edge.into());
        self
    }

    pub const fn required(mut self) -> Self {
        self.descriptor.required = true;
        self
    }

    /// Bind the edge to a foreign-key field of the declaring entity.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.descriptor.field = Some(field.into());
        self
    }

    /// Validate the names and return the descriptor.
    ///
    /// Target existence is checked when the edge is placed in a registry.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyName` if the edge name or target is empty, or
    /// `CoreError::InvalidName` if either is not an identifier.
    pub fn build(self) -> Result<EdgeDescriptor, CoreError> {
        self.descriptor.check()?;
        Ok(self.descriptor)
    }
}

/// Declare an owning edge.
pub fn to(name: impl Into<String>, target: impl Into<String>) -> EdgeBuilder {
    EdgeBuilder::new(name.into(), target.into(), EdgeDirection::To)
}

/// Declare a back-reference edge. Pair it with [`EdgeBuilder::reference`].
pub fn from(name: impl Into<String>, target: impl Into<String>) -> EdgeBuilder {
    EdgeBuilder::new(name.into(), target.into(), EdgeDirection::From)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("posts", Cardinality::Many)]
    #[case("subscriptions", Cardinality::Many)]
    #[case("user", Cardinality::One)]
    #[case("github", Cardinality::One)]
    #[case("address", Cardinality::One)]
    #[case("s", Cardinality::One)]
    #[case("status", Cardinality::Many)]
    #[case("alias", Cardinality::Many)]
    fn cardinality_follows_plurality(#[case] name: &str, #[case] expected: Cardinality) {
        assert_eq!(Cardinality::infer(name), expected);
    }

    #[test]
    fn unique_overrides_misread_plural() {
        let edge = to("status", "Status").unique().build().unwrap();
        assert_eq!(edge.cardinality, Cardinality::One);
    }

    #[test]
    fn to_edge_infers_many() {
        let edge = to("posts", "Post").build().unwrap();
        assert_eq!(edge.direction, EdgeDirection::To);
        assert_eq!(edge.cardinality, Cardinality::Many);
        assert_eq!(edge.inverse, None);
    }

    #[test]
    fn back_reference_carries_ref_and_field() {
        let edge = from("user", "User")
            .reference("github")
            .unique()
            .required()
            .field("userId")
            .build()
            .unwrap();
        assert!(edge.is_back_reference());
        assert_eq!(edge.inverse.as_deref(), Some("github"));
        assert_eq!(edge.field.as_deref(), Some("userId"));
        assert!(edge.required);
    }

    #[test]
    fn empty_target_is_rejected() {
        assert_eq!(
            to("user", "").build(),
            Err(CoreError::EmptyName {
                kind: "edge target"
            })
        );
    }

    #[test]
    fn ref_serializes_under_ref_key() {
        let edge = from("user", "User").reference("discord").build().unwrap();
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["ref"], "discord");
        assert!(json.get("required").is_none());
    }
}
