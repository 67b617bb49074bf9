//! Well-formedness validation of a built registry.
//!
//! Construction already rejects duplicate names and dangling edges. The rules
//! here cover what a registry may legally contain but the generator should not
//! receive: entities without identity, defaults that do not fit their field,
//! enum placeholders, soft-delete conventions, and relation shape.

use std::collections::HashSet;
use std::fmt;

use entwine_core::entity::{SOFT_DELETE_FIELD, TIMESTAMP_FIELDS};
use entwine_core::{Cardinality, EdgeDescriptor, EdgeDirection, EntityDescriptor, FieldType};
use serde::Serialize;

use crate::registry::SchemaRegistry;

// ---------------------------------------------------------------------------
// Rule / Severity
// ---------------------------------------------------------------------------

/// Named validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    MissingIdentity,
    DefaultTypeMismatch,
    UnresolvedEnum,
    DuplicateEnumValue,
    TimestampType,
    SoftDeleteNotOptional,
    MissingSoftDelete,
    UnresolvedInverse,
    AsymmetricRelation,
    UnboundForeignKey,
}

impl Rule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingIdentity => "missing_identity",
            Self::DefaultTypeMismatch => "default_type_mismatch",
            Self::UnresolvedEnum => "unresolved_enum",
            Self::DuplicateEnumValue => "duplicate_enum_value",
            Self::TimestampType => "timestamp_type",
            Self::SoftDeleteNotOptional => "soft_delete_not_optional",
            Self::MissingSoftDelete => "missing_soft_delete",
            Self::UnresolvedInverse => "unresolved_inverse",
            Self::AsymmetricRelation => "asymmetric_relation",
            Self::UnboundForeignKey => "unbound_foreign_key",
        }
    }

    /// Severity a violation of this rule is reported with.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::MissingSoftDelete | Self::AsymmetricRelation => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Violation / ValidationReport
// ---------------------------------------------------------------------------

/// One broken rule, located by entity and field or edge name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: Rule,
    pub severity: Severity,
    pub entity: String,
    /// Field or edge the violation is about; `None` for entity-level rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

impl Violation {
    fn new(rule: Rule, entity: &str, subject: Option<&str>, message: String) -> Self {
        Self {
            rule,
            severity: rule.severity(),
            entity: entity.to_string(),
            subject: subject.map(str::to_string),
            message,
        }
    }

    /// `Entity.subject` or just `Entity`.
    #[must_use]
    pub fn location(&self) -> String {
        match &self.subject {
            Some(subject) => format!("{}.{subject}", self.entity),
            None => self.entity.clone(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity,
            self.rule,
            self.location(),
            self.message
        )
    }
}

/// Result of [`SchemaRegistry::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub entities_checked: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Valid when no error-severity violation was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Whether the report passes; strict mode also fails on warnings.
    #[must_use]
    pub fn passes(&self, strict: bool) -> bool {
        self.is_valid() && (!strict || self.warning_count() == 0)
    }

    /// Violations of a single rule.
    pub fn by_rule(&self, rule: Rule) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.rule == rule)
    }

    /// One-line summary, e.g. `5 entities checked: 2 errors, 1 warning`.
    #[must_use]
    pub fn summary(&self) -> String {
        let errors = self.error_count();
        let warnings = self.warning_count();
        format!(
            "{} entities checked: {errors} error{}, {warnings} warning{}",
            self.entities_checked,
            if errors == 1 { "" } else { "s" },
            if warnings == 1 { "" } else { "s" },
        )
    }

    fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

impl SchemaRegistry {
    /// Check every declared entity against the well-formedness rules.
    ///
    /// External entities are only edge targets and are not checked.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut violations = Vec::new();
        let mut entities_checked = 0usize;

        for entity in self.declared() {
            entities_checked += 1;
            check_identity(entity, &mut violations);
            check_fields(entity, &mut violations);
            check_soft_delete(entity, &mut violations);
            self.check_edges(entity, &mut violations);
        }

        for violation in &violations {
            tracing::debug!(
                rule = %violation.rule,
                location = %violation.location(),
                "schema violation"
            );
        }

        ValidationReport {
            entities_checked,
            violations,
        }
    }

    fn check_edges(&self, entity: &EntityDescriptor, out: &mut Vec<Violation>) {
        for edge in &entity.edges {
            if let Some(field_name) = &edge.field {
                match entity.field(field_name) {
                    None => out.push(Violation::new(
                        Rule::UnboundForeignKey,
                        &entity.name,
                        Some(&edge.name),
                        format!("edge is bound to undeclared field '{field_name}'"),
                    )),
                    Some(fk) if fk.field_type != FieldType::String => out.push(Violation::new(
                        Rule::UnboundForeignKey,
                        &entity.name,
                        Some(&edge.name),
                        format!(
                            "foreign-key field '{field_name}' is {}, expected string",
                            fk.field_type.as_str()
                        ),
                    )),
                    Some(_) if edge.cardinality == Cardinality::Many => {
                        out.push(Violation::new(
                            Rule::UnboundForeignKey,
                            &entity.name,
                            Some(&edge.name),
                            format!("many edge cannot store its target in field '{field_name}'"),
                        ));
                    }
                    Some(_) => {}
                }
            }

            match edge.direction {
                EdgeDirection::From => self.check_back_reference(entity, edge, out),
                EdgeDirection::To => self.check_asymmetry(entity, edge, out),
            }
        }
    }

    fn check_back_reference(
        &self,
        entity: &EntityDescriptor,
        edge: &EdgeDescriptor,
        out: &mut Vec<Violation>,
    ) {
        let Some(owner_edge) = &edge.inverse else {
            out.push(Violation::new(
                Rule::UnresolvedInverse,
                &entity.name,
                Some(&edge.name),
                "back-reference does not name its owning edge".to_string(),
            ));
            return;
        };

        // External targets expose no edges, so the ref cannot be checked.
        let Some(target) = self.get(&edge.target) else {
            return;
        };
        if target.external {
            return;
        }

        let resolved = target.edge(owner_edge).is_some_and(|owner| {
            owner.direction == EdgeDirection::To && owner.target == entity.name
        });
        if !resolved {
            out.push(Violation::new(
                Rule::UnresolvedInverse,
                &entity.name,
                Some(&edge.name),
                format!(
                    "ref '{owner_edge}' is not a to-edge on {} pointing at {}",
                    edge.target, entity.name
                ),
            ));
        }
    }

    /// Flag A->B paired with an independent B->A owning edge. Each pair is
    /// reported once, on the entity whose name sorts first.
    fn check_asymmetry(
        &self,
        entity: &EntityDescriptor,
        edge: &EdgeDescriptor,
        out: &mut Vec<Violation>,
    ) {
        if edge.target == entity.name || entity.name > edge.target {
            return;
        }
        let Some(target) = self.get(&edge.target) else {
            return;
        };
        for reverse in target
            .owned_edges()
            .filter(|reverse| reverse.target == entity.name)
        {
            out.push(Violation::new(
                Rule::AsymmetricRelation,
                &entity.name,
                Some(&edge.name),
                format!(
                    "{}.{} and {}.{} are independent owning edges; declare one side as a from-edge with ref",
                    entity.name, edge.name, target.name, reverse.name
                ),
            ));
        }
    }
}

fn check_identity(entity: &EntityDescriptor, out: &mut Vec<Violation>) {
    if !entity.has_identity() {
        out.push(Violation::new(
            Rule::MissingIdentity,
            &entity.name,
            None,
            "entity declares neither an 'id' field nor a unique field".to_string(),
        ));
    }
}

fn check_fields(entity: &EntityDescriptor, out: &mut Vec<Violation>) {
    for field in &entity.fields {
        if let Some(default) = &field.default {
            if !default.fits(&field.field_type) {
                out.push(Violation::new(
                    Rule::DefaultTypeMismatch,
                    &entity.name,
                    Some(&field.name),
                    format!(
                        "default {default} ({}) does not fit field type {}",
                        default.kind(),
                        field.field_type
                    ),
                ));
            }
        }

        if let Some(values) = field.field_type.enum_values() {
            if values.is_empty() {
                out.push(Violation::new(
                    Rule::UnresolvedEnum,
                    &entity.name,
                    Some(&field.name),
                    format!(
                        "enum has no members; configure enums.{}.{}",
                        entity.name, field.name
                    ),
                ));
            }
            let mut seen = HashSet::new();
            for value in values {
                if !seen.insert(value.as_str()) {
                    out.push(Violation::new(
                        Rule::DuplicateEnumValue,
                        &entity.name,
                        Some(&field.name),
                        format!("member '{value}' is listed more than once"),
                    ));
                }
            }
        }

        let is_timestamp =
            TIMESTAMP_FIELDS.contains(&field.name.as_str()) || field.name == SOFT_DELETE_FIELD;
        if is_timestamp && field.field_type != FieldType::Time {
            out.push(Violation::new(
                Rule::TimestampType,
                &entity.name,
                Some(&field.name),
                format!("must be time, found {}", field.field_type.as_str()),
            ));
        }
    }
}

fn check_soft_delete(entity: &EntityDescriptor, out: &mut Vec<Violation>) {
    match entity.soft_delete_field() {
        Some(field) if !field.optional => out.push(Violation::new(
            Rule::SoftDeleteNotOptional,
            &entity.name,
            Some(&field.name),
            "soft-delete timestamp must be optional; null marks an active record".to_string(),
        )),
        Some(_) => {}
        None if entity.has_timestamps() => out.push(Violation::new(
            Rule::MissingSoftDelete,
            &entity.name,
            None,
            format!("entity has timestamps but no optional '{SOFT_DELETE_FIELD}'"),
        )),
        None => {}
    }
}
