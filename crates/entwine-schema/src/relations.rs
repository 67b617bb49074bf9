//! Relation view over owning edges and their back-references.

use entwine_core::{Cardinality, EdgeDescriptor, EdgeDirection};
use serde::Serialize;

use crate::error::SchemaError;
use crate::registry::SchemaRegistry;

/// One conceptual relation, listed once from its owning side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub owner: String,
    pub edge: String,
    pub target: String,
    pub cardinality: Cardinality,
    /// Back-reference edge on `target`, when one is declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse_cardinality: Option<Cardinality>,
}

impl SchemaRegistry {
    /// Every owning edge with its resolved back-reference, in declaration
    /// order.
    #[must_use]
    pub fn relations(&self) -> Vec<Relation> {
        self.declared()
            .flat_map(|owner| {
                owner.owned_edges().map(move |edge| {
                    let inverse = self.back_reference(&owner.name, edge);
                    Relation {
                        owner: owner.name.clone(),
                        edge: edge.name.clone(),
                        target: edge.target.clone(),
                        cardinality: edge.cardinality,
                        inverse: inverse.map(|e| e.name.clone()),
                        inverse_cardinality: inverse.map(|e| e.cardinality),
                    }
                })
            })
            .collect()
    }

    /// Navigate across a relation.
    ///
    /// From a back-reference this returns the owning edge on the target; from
    /// an owning edge it returns the back-reference declared for it, if any.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` for an unknown entity and
    /// `SchemaError::UnknownField` for an unknown edge.
    pub fn inverse_of(
        &self,
        entity: &str,
        edge: &str,
    ) -> Result<Option<&EdgeDescriptor>, SchemaError> {
        let descriptor = self.entity(entity)?;
        let edge = descriptor
            .edge(edge)
            .ok_or_else(|| SchemaError::UnknownField {
                entity: entity.to_string(),
                field: edge.to_string(),
            })?;

        Ok(match edge.direction {
            EdgeDirection::From => edge.inverse.as_deref().and_then(|owner_edge| {
                self.get(&edge.target)?
                    .edge(owner_edge)
                    .filter(|owner| owner.direction == EdgeDirection::To && owner.target == entity)
            }),
            EdgeDirection::To => self.back_reference(entity, edge),
        })
    }

    fn back_reference(&self, owner: &str, edge: &EdgeDescriptor) -> Option<&EdgeDescriptor> {
        self.get(&edge.target)?.edges.iter().find(|candidate| {
            candidate.direction == EdgeDirection::From
                && candidate.target == owner
                && candidate.inverse.as_deref() == Some(edge.name.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entwine_core::{EntityDescriptor, edge, field};
    use pretty_assertions::assert_eq;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builder()
            .entity(
                EntityDescriptor::builder("User")
                    .field(field::string("id"))
                    .edge(edge::to("github", "GitHub").unique())
                    .edge(edge::to("posts", "Post")),
            )
            .entity(
                EntityDescriptor::builder("GitHub")
                    .field(field::string("accountId").unique())
                    .field(field::string("userId"))
                    .edge(
                        edge::from("user", "User")
                            .reference("github")
                            .unique()
                            .field("userId"),
                    ),
            )
            .external("Post")
            .build()
            .unwrap()
    }

    #[test]
    fn relations_list_each_owning_edge_once() {
        let relations = registry().relations();
        assert_eq!(
            relations,
            vec![
                Relation {
                    owner: "User".into(),
                    edge: "github".into(),
                    target: "GitHub".into(),
                    cardinality: Cardinality::One,
                    inverse: Some("user".into()),
                    inverse_cardinality: Some(Cardinality::One),
                },
                Relation {
                    owner: "User".into(),
                    edge: "posts".into(),
                    target: "Post".into(),
                    cardinality: Cardinality::Many,
                    inverse: None,
                    inverse_cardinality: None,
                },
            ]
        );
    }

    #[test]
    fn inverse_navigates_both_ways() {
        let reg = registry();
        let owner = reg.inverse_of("GitHub", "user").unwrap().unwrap();
        assert_eq!(owner.name, "github");
        let back = reg.inverse_of("User", "github").unwrap().unwrap();
        assert_eq!(back.name, "user");
        assert!(reg.inverse_of("User", "posts").unwrap().is_none());
    }

    #[test]
    fn inverse_of_unknown_edge() {
        let reg = registry();
        assert!(matches!(
            reg.inverse_of("User", "servers"),
            Err(SchemaError::UnknownField { .. })
        ));
        assert!(matches!(
            reg.inverse_of("Nobody", "user"),
            Err(SchemaError::NotFound(_))
        ));
    }
}
