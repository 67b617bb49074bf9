//! Testable properties of the built-in community schema.

use entwine_core::entity::{SOFT_DELETE_FIELD, TIMESTAMP_FIELDS};
use entwine_core::{EntityDescriptor, FieldType, edge, field};
use entwine_schema::{Rule, SchemaRegistry, Severity, community_schema};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn members(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn resolved() -> SchemaRegistry {
    let mut registry = community_schema().expect("community schema builds");
    let roles = members(&["member", "moderator", "owner"]);
    let plans = members(&["free", "pro"]);
    let applied = registry
        .apply_enum_values([
            ("User", "role", roles.as_slice()),
            ("Subscription", "plan", plans.as_slice()),
        ])
        .expect("enum members apply");
    assert_eq!(applied, 2);
    registry
}

#[test]
fn field_names_are_unique_per_entity() {
    let registry = community_schema().unwrap();
    for entity in registry.entities() {
        let mut seen = HashSet::new();
        for field in &entity.fields {
            assert!(
                seen.insert(field.name.as_str()),
                "{}.{} declared twice",
                entity.name,
                field.name
            );
        }
    }
}

#[test]
fn every_edge_target_is_declared() {
    let registry = community_schema().unwrap();
    for entity in registry.entities() {
        for edge in &entity.edges {
            assert!(
                registry.contains(&edge.target),
                "{}.{} targets {}",
                entity.name,
                edge.name,
                edge.target
            );
        }
    }
}

#[test]
fn timestamped_entities_are_soft_deletable() {
    let registry = community_schema().unwrap();
    for entity in registry.declared() {
        let has_timestamps = TIMESTAMP_FIELDS
            .iter()
            .any(|name| entity.field(name).is_some());
        if has_timestamps {
            let deleted = entity
                .field(SOFT_DELETE_FIELD)
                .unwrap_or_else(|| panic!("{} lacks {SOFT_DELETE_FIELD}", entity.name));
            assert!(deleted.optional, "{}.deletedAt must be optional", entity.name);
            assert_eq!(deleted.field_type, FieldType::Time);
        }
    }
}

#[test]
fn defaults_fit_their_fields() {
    let registry = community_schema().unwrap();
    for entity in registry.declared() {
        for field in &entity.fields {
            if let Some(default) = &field.default {
                assert!(
                    default.fits(&field.field_type),
                    "{}.{}",
                    entity.name,
                    field.name
                );
            }
        }
    }
    let admin = registry.get("User").unwrap().field("admin").unwrap();
    assert_eq!(admin.default, Some(false.into()));
}

#[test]
fn enum_placeholders_fail_until_resolved() {
    let report = community_schema().unwrap().validate();
    assert!(!report.is_valid());
    assert_eq!(report.entities_checked, 5);
    assert_eq!(report.error_count(), 2);
    assert_eq!(report.warning_count(), 0);

    let locations: Vec<String> = report
        .by_rule(Rule::UnresolvedEnum)
        .map(|v| v.location())
        .collect();
    assert_eq!(locations, ["User.role", "Subscription.plan"]);
}

#[test]
fn resolved_schema_is_valid() {
    let report = resolved().validate();
    assert!(report.is_valid(), "{:?}", report.violations);
    assert!(report.passes(true));

    let registry = resolved();
    let role = registry.get("User").unwrap().field("role").unwrap();
    assert_eq!(
        role.field_type.enum_values().map(<[String]>::len),
        Some(3)
    );
}

#[test]
fn round_trip_yields_identical_registry() {
    let registry = resolved();
    let json = registry.to_json().unwrap();
    assert_eq!(SchemaRegistry::from_json(&json).unwrap(), registry);
    let toml = registry.to_toml().unwrap();
    assert_eq!(SchemaRegistry::from_toml(&toml).unwrap(), registry);
}

#[test]
fn relations_are_declared_once() {
    let registry = resolved();
    let relations = registry.relations();
    assert_eq!(relations.len(), 8);

    let with_inverse: Vec<(&str, &str, &str)> = relations
        .iter()
        .filter_map(|r| {
            r.inverse
                .as_deref()
                .map(|inverse| (r.owner.as_str(), r.edge.as_str(), inverse))
        })
        .collect();
    assert_eq!(
        with_inverse,
        [
            ("User", "github", "user"),
            ("User", "discord", "user"),
            ("User", "subscriptions", "user"),
        ]
    );
}

/// The layout the model was first written in: every link declared as an
/// independent owning edge on both sides.
#[test]
fn independent_reverse_edges_are_flagged() {
    let registry = SchemaRegistry::builder()
        .entity(
            EntityDescriptor::builder("User")
                .field(field::string("id").unique())
                .edge(edge::to("github", "GitHub").unique()),
        )
        .entity(
            EntityDescriptor::builder("GitHub")
                .field(field::string("userId"))
                .field(field::string("accountId").unique())
                .edge(edge::to("user", "User").unique()),
        )
        .build()
        .unwrap();

    let report = registry.validate();
    let flagged: Vec<_> = report.by_rule(Rule::AsymmetricRelation).collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].severity, Severity::Warning);
    assert_eq!(flagged[0].location(), "GitHub.user");
    assert!(report.is_valid());
    assert!(!report.passes(true));
}

#[test]
fn sample_user_record_validates() {
    let registry = resolved();
    let mut record = serde_json::json!({
        "id": "usr_1",
        "email": "ada@example.com",
        "role": "owner",
        "name": "Ada",
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-02T10:00:00Z",
        "deletedAt": null,
    });
    assert_eq!(registry.apply_defaults("User", &mut record).unwrap(), 1);
    registry.validate_record("User", &record).unwrap();
}
