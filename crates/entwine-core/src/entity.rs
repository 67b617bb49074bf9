//! Entity descriptors.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::edge::{EdgeBuilder, EdgeDescriptor, EdgeDirection};
use crate::errors::CoreError;
use crate::field::{FieldBuilder, FieldDescriptor, check_name};
use crate::types::FieldType;

/// Field that marks a record inactive when set.
pub const SOFT_DELETE_FIELD: &str = "deletedAt";

/// Creation and last-update timestamps.
pub const TIMESTAMP_FIELDS: [&str; 2] = ["createdAt", "updatedAt"];

/// Conventional identity field name.
pub const ID_FIELD: &str = "id";

/// A named record type with ordered fields and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntityDescriptor {
    pub name: String,

    /// Declared by another schema module; only its name is known here.
    #[serde(default, skip_serializing_if = "crate::is_false")]
    pub external: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeDescriptor>,
}

impl EntityDescriptor {
    /// Start declaring an entity.
    pub fn builder(name: impl Into<String>) -> EntityBuilder {
        EntityBuilder {
            name: name.into(),
            comment: None,
            fields: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Declare a name-only entity owned by another schema module.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyName` or `CoreError::InvalidName`.
    pub fn external(name: impl Into<String>) -> Result<Self, CoreError> {
        let entity = Self {
            name: name.into(),
            external: true,
            comment: None,
            fields: Vec::new(),
            edges: Vec::new(),
        };
        entity.check()?;
        Ok(entity)
    }

    /// Structural checks: valid names, unique field names, unique edge names.
    ///
    /// # Errors
    ///
    /// Returns the first `CoreError` found, in declaration order.
    pub fn check(&self) -> Result<(), CoreError> {
        check_name("entity", &self.name)?;

        let mut seen = HashSet::new();
        for field in &self.fields {
            field.check()?;
            if !seen.insert(field.name.as_str()) {
                return Err(CoreError::DuplicateField {
                    entity: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for edge in &self.edges {
            edge.check()?;
            if !seen.insert(edge.name.as_str()) {
                return Err(CoreError::DuplicateEdge {
                    entity: self.name.clone(),
                    edge: edge.name.clone(),
                });
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn edge(&self, name: &str) -> Option<&EdgeDescriptor> {
        self.edges.iter().find(|e| e.name == name)
    }

    /// Fields that identify a record: `id` plus every unique field.
    #[must_use]
    pub fn identity_fields(&self) -> Vec<&FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| f.name == ID_FIELD || f.unique)
            .collect()
    }

    #[must_use]
    pub fn has_identity(&self) -> bool {
        !self.identity_fields().is_empty()
    }

    /// Whether `createdAt` or `updatedAt` is declared.
    #[must_use]
    pub fn has_timestamps(&self) -> bool {
        TIMESTAMP_FIELDS.iter().any(|name| self.field(name).is_some())
    }

    #[must_use]
    pub fn soft_delete_field(&self) -> Option<&FieldDescriptor> {
        self.field(SOFT_DELETE_FIELD)
    }

    /// Soft-deletable entities carry an optional `deletedAt` timestamp.
    #[must_use]
    pub fn is_soft_deletable(&self) -> bool {
        self.soft_delete_field()
            .is_some_and(|f| f.optional && f.field_type == FieldType::Time)
    }

    /// Owning edges, in declaration order.
    pub fn owned_edges(&self) -> impl Iterator<Item = &EdgeDescriptor> {
        self.edges.iter().filter(|e| e.direction == EdgeDirection::To)
    }

    /// Enum fields with no members yet.
    pub fn unresolved_enums(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.field_type.is_unresolved_enum())
    }
}

/// Builder returned by [`EntityDescriptor::builder`].
///
/// Field and edge builders are collected as-is and built together, so the
/// first declaration error is reported from [`EntityBuilder::build`].
#[derive(Debug, Clone)]
#[must_use]
pub struct EntityBuilder {
    name: String,
    comment: Option<String>,
    fields: Vec<FieldBuilder>,
    edges: Vec<EdgeBuilder>,
}

impl EntityBuilder {
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    pub fn edge(mut self, edge: EdgeBuilder) -> Self {
        self.edges.push(edge);
        self
    }

    /// Build every field and edge and run the entity checks.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DuplicateField` when two fields share a name,
    /// `CoreError::DuplicateEdge` when two edges share a name, and the
    /// name errors of the individual declarations.
    pub fn build(self) -> Result<EntityDescriptor, CoreError> {
        let fields = self
            .fields
            .into_iter()
            .map(FieldBuilder::build)
            .collect::<Result<Vec<_>, _>>()?;
        let edges = self
            .edges
            .into_iter()
            .map(EdgeBuilder::build)
            .collect::<Result<Vec<_>, _>>()?;

        let entity = EntityDescriptor {
            name: self.name,
            external: false,
            comment: self.comment,
            fields,
            edges,
        };
        entity.check()?;
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{edge, field};
    use pretty_assertions::assert_eq;

    fn tag() -> EntityDescriptor {
        EntityDescriptor::builder("Tag")
            .field(field::string("id").unique())
            .field(field::string("name"))
            .edge(edge::to("posts", "Post"))
            .build()
            .unwrap()
    }

    #[test]
    fn fields_keep_declaration_order() {
        let tag = tag();
        let names: Vec<&str> = tag.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "name"]);
    }

    #[test]
    fn duplicate_field_is_rejected() {
        let err = EntityDescriptor::builder("Tag")
            .field(field::string("id"))
            .field(field::string("id"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::DuplicateField {
                entity: "Tag".into(),
                field: "id".into()
            }
        );
    }

    #[test]
    fn duplicate_edge_is_rejected() {
        let err = EntityDescriptor::builder("User")
            .field(field::string("id"))
            .edge(edge::to("posts", "Post"))
            .edge(edge::to("posts", "Post"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateEdge { .. }));
    }

    #[test]
    fn field_errors_surface_from_entity_build() {
        let err = EntityDescriptor::builder("User")
            .field(field::string(""))
            .build()
            .unwrap_err();
        assert_eq!(err, CoreError::EmptyName { kind: "field" });
    }

    #[test]
    fn identity_from_unique_field() {
        let github = EntityDescriptor::builder("GitHub")
            .field(field::string("userId"))
            .field(field::string("accountId").unique())
            .build()
            .unwrap();
        let identity: Vec<&str> = github
            .identity_fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(identity, ["accountId"]);
    }

    #[test]
    fn soft_delete_detection() {
        let entity = EntityDescriptor::builder("Subscription")
            .field(field::string("id"))
            .field(field::time("createdAt"))
            .field(field::time("updatedAt"))
            .field(field::time("deletedAt").optional())
            .build()
            .unwrap();
        assert!(entity.has_timestamps());
        assert!(entity.is_soft_deletable());
        assert!(!tag().has_timestamps());
        assert!(!tag().is_soft_deletable());
    }

    #[test]
    fn external_entity_has_no_fields() {
        let post = EntityDescriptor::external("Post").unwrap();
        assert!(post.external);
        assert!(post.fields.is_empty());
        assert!(EntityDescriptor::external("").is_err());
    }
}
