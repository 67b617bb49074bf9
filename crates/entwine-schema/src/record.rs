//! Record-level validation against a registry entity.
//!
//! Each entity derives a draft 2020-12 JSON Schema that a concrete JSON
//! record must satisfy. Structural checks run through `jsonschema`; the
//! temporal invariants (RFC 3339 timestamps, `updatedAt >= createdAt`,
//! `deletedAt >= createdAt`) are checked with `chrono` afterwards.

use chrono::{DateTime, FixedOffset};
use entwine_core::entity::{SOFT_DELETE_FIELD, TIMESTAMP_FIELDS};
use entwine_core::{DefaultValue, EntityDescriptor, FieldDescriptor, FieldType};
use serde_json::{Map, Value, json};

use crate::error::SchemaError;
use crate::registry::SchemaRegistry;

const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

impl SchemaRegistry {
    /// JSON Schema for records of `entity`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the entity is unknown.
    pub fn json_schema(&self, entity: &str) -> Result<Value, SchemaError> {
        Ok(entity_schema(self.entity(entity)?))
    }

    /// Validate a JSON record against `entity`.
    ///
    /// # Errors
    ///
    /// - `SchemaError::NotFound` if the entity is unknown
    /// - `SchemaError::Generation` if the derived schema fails to compile
    /// - `SchemaError::ValidationFailed` with every structural and temporal
    ///   error found
    pub fn validate_record(&self, entity: &str, record: &Value) -> Result<(), SchemaError> {
        let descriptor = self.entity(entity)?;
        let schema = entity_schema(descriptor);

        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let mut errors: Vec<String> = validator
            .iter_errors(record)
            .map(|e| format!("{e}"))
            .collect();

        if let Some(object) = record.as_object() {
            errors.extend(temporal_errors(descriptor, object));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(entity, errors = errors.len(), "record rejected");
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Fill absent defaulted fields of `record` in place.
    ///
    /// Returns how many fields were filled. Explicit `null` values are left
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the entity is unknown and
    /// `SchemaError::ValidationFailed` if `record` is not a JSON object.
    pub fn apply_defaults(&self, entity: &str, record: &mut Value) -> Result<usize, SchemaError> {
        let descriptor = self.entity(entity)?;
        let object = record
            .as_object_mut()
            .ok_or_else(|| SchemaError::ValidationFailed {
                errors: vec![format!("{entity} record must be a JSON object")],
            })?;

        let mut filled = 0usize;
        for field in &descriptor.fields {
            let Some(default) = &field.default else {
                continue;
            };
            if !object.contains_key(&field.name) {
                object.insert(field.name.clone(), default_json(default));
                filled += 1;
            }
        }
        Ok(filled)
    }
}

fn entity_schema(entity: &EntityDescriptor) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &entity.fields {
        properties.insert(field.name.clone(), field_schema(field));
        if !field.is_omittable() {
            required.push(Value::String(field.name.clone()));
        }
    }

    let mut schema = json!({
        "$schema": DRAFT_2020_12,
        "title": entity.name,
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    });
    if let Some(comment) = &entity.comment {
        schema["description"] = Value::String(comment.clone());
    }
    schema
}

fn field_schema(field: &FieldDescriptor) -> Value {
    let mut schema = match &field.field_type {
        FieldType::String => json!({ "type": "string" }),
        FieldType::Bool => json!({ "type": "boolean" }),
        FieldType::Int => json!({ "type": "integer" }),
        FieldType::Float => json!({ "type": "number" }),
        FieldType::Time => json!({ "type": "string", "format": "date-time" }),
        FieldType::Enum { values } if values.is_empty() => json!({ "type": "string" }),
        FieldType::Enum { values } => json!({ "type": "string", "enum": values }),
    };

    if let Some(default) = &field.default {
        schema["default"] = default_json(default);
    }
    if let Some(comment) = &field.comment {
        schema["description"] = Value::String(comment.clone());
    }

    if field.optional {
        json!({ "anyOf": [schema, { "type": "null" }] })
    } else {
        schema
    }
}

fn default_json(default: &DefaultValue) -> Value {
    match default {
        DefaultValue::Bool(value) => Value::Bool(*value),
        DefaultValue::Int(value) => Value::from(*value),
        DefaultValue::Float(value) => Value::from(*value),
        DefaultValue::String(value) => Value::String(value.clone()),
    }
}

fn temporal_errors(entity: &EntityDescriptor, record: &Map<String, Value>) -> Vec<String> {
    let mut errors = Vec::new();
    let mut parsed = |name: &str| -> Option<DateTime<FixedOffset>> {
        let field = entity.field(name)?;
        if field.field_type != FieldType::Time {
            return None;
        }
        let raw = record.get(name)?.as_str()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                errors.push(format!("{name}: '{raw}' is not an RFC 3339 timestamp ({e})"));
                None
            }
        }
    };

    let [created_name, updated_name] = TIMESTAMP_FIELDS;
    let created = parsed(created_name);
    let updated = parsed(updated_name);
    let deleted = parsed(SOFT_DELETE_FIELD);

    // Other time fields only need to parse.
    for field in entity.fields.iter().filter(|f| {
        f.field_type == FieldType::Time
            && f.name != created_name
            && f.name != updated_name
            && f.name != SOFT_DELETE_FIELD
    }) {
        parsed(&field.name);
    }

    if let (Some(created), Some(updated)) = (created, updated) {
        if updated < created {
            errors.push(format!(
                "{updated_name} ({updated}) is earlier than {created_name} ({created})"
            ));
        }
    }
    if let (Some(created), Some(deleted)) = (created, deleted) {
        if deleted < created {
            errors.push(format!(
                "{SOFT_DELETE_FIELD} ({deleted}) is earlier than {created_name} ({created})"
            ));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use entwine_core::field;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builder()
            .entity(
                EntityDescriptor::builder("User")
                    .field(field::string("id").unique())
                    .field(field::enumeration("role").values(["member", "owner"]))
                    .field(field::string("bio").optional())
                    .field(field::boolean("admin").default(false))
                    .field(field::time("createdAt"))
                    .field(field::time("updatedAt"))
                    .field(field::time("deletedAt").optional()),
            )
            .build()
            .unwrap()
    }

    fn user() -> Value {
        json!({
            "id": "u1",
            "role": "member",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z",
        })
    }

    #[test]
    fn schema_marks_required_and_nullable() {
        let schema = registry().json_schema("User").unwrap();
        assert_eq!(
            schema["required"],
            json!(["id", "role", "createdAt", "updatedAt"])
        );
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["role"]["enum"], json!(["member", "owner"]));
        assert_eq!(schema["properties"]["admin"]["default"], json!(false));
        assert_eq!(
            schema["properties"]["deletedAt"]["anyOf"][1],
            json!({ "type": "null" })
        );
    }

    #[test]
    fn valid_record_passes() {
        let reg = registry();
        reg.validate_record("User", &user()).unwrap();

        let mut deleted = user();
        deleted["deletedAt"] = json!("2024-02-01T00:00:00+02:00");
        deleted["bio"] = Value::Null;
        reg.validate_record("User", &deleted).unwrap();
    }

    #[rstest]
    #[case("role", json!("admin"))]
    #[case("admin", json!("yes"))]
    #[case("unknown", json!(1))]
    #[case("createdAt", json!("yesterday"))]
    #[case("updatedAt", json!("2023-12-31T23:59:59Z"))]
    #[case("deletedAt", json!("2023-06-01T00:00:00Z"))]
    fn invalid_records_are_rejected(#[case] key: &str, #[case] value: Value) {
        let mut record = user();
        record[key] = value;
        let err = registry().validate_record("User", &record).unwrap_err();
        match err {
            SchemaError::ValidationFailed { errors } => assert!(!errors.is_empty()),
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_field_is_reported() {
        let mut record = user();
        record.as_object_mut().unwrap().remove("role");
        assert!(matches!(
            registry().validate_record("User", &record),
            Err(SchemaError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn apply_defaults_fills_absent_fields() {
        let reg = registry();
        let mut record = user();
        assert_eq!(reg.apply_defaults("User", &mut record).unwrap(), 1);
        assert_eq!(record["admin"], json!(false));
        assert_eq!(reg.apply_defaults("User", &mut record).unwrap(), 0);
    }

    #[test]
    fn apply_defaults_requires_object() {
        let mut record = json!([1, 2]);
        assert!(matches!(
            registry().apply_defaults("User", &mut record),
            Err(SchemaError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn unknown_entity() {
        assert!(matches!(
            registry().json_schema("Post"),
            Err(SchemaError::NotFound(_))
        ));
    }
}
