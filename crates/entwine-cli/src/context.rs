use std::path::PathBuf;

use anyhow::Context;
use entwine_config::{EntwineConfig, EnumConfig};
use entwine_schema::{SchemaError, SchemaRegistry, community_schema};

use crate::cli::GlobalFlags;

/// Where the registry came from.
#[derive(Clone, Debug)]
pub enum SchemaSource {
    Builtin,
    File(PathBuf),
}

/// Configuration plus the registry every command operates on.
pub struct AppContext {
    pub config: EntwineConfig,
    pub registry: SchemaRegistry,
    pub source: SchemaSource,
}

impl AppContext {
    /// Load configuration, then the built-in or `--schema` registry, and apply
    /// configured enum members to it.
    pub fn init(flags: &GlobalFlags) -> anyhow::Result<Self> {
        let config = match &flags.config {
            Some(path) => EntwineConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => EntwineConfig::load_with_dotenv().context("failed to load configuration")?,
        };

        let (mut registry, source) = match &flags.schema {
            Some(path) => (
                SchemaRegistry::load_file(path)
                    .with_context(|| format!("failed to load schema from {}", path.display()))?,
                SchemaSource::File(path.clone()),
            ),
            None => (
                community_schema().context("built-in schema is inconsistent")?,
                SchemaSource::Builtin,
            ),
        };

        let applied = apply_configured_enums(&mut registry, &config.enums)?;
        tracing::debug!(
            source = ?source,
            entities = registry.len(),
            enums_applied = applied,
            "schema loaded"
        );

        Ok(Self {
            config,
            registry,
            source,
        })
    }
}

/// Resolve configured enum members against the registry.
///
/// Entries naming an entity or field the registry does not have are skipped
/// with a warning, so one config can serve several schema files. Entries that
/// name a non-enum field are an error.
pub fn apply_configured_enums(
    registry: &mut SchemaRegistry,
    enums: &EnumConfig,
) -> anyhow::Result<usize> {
    let mut applied = 0usize;
    for (entity, field, members) in enums.entries() {
        match registry.resolve_enum(entity, field, members) {
            Ok(()) => applied += 1,
            Err(SchemaError::NotFound(_) | SchemaError::UnknownField { .. }) => {
                tracing::warn!(
                    "config key enums.{entity}.{field} does not match any enum field in the schema"
                );
            }
            Err(error) => {
                return Err(error).with_context(|| format!("invalid config key enums.{entity}.{field}"));
            }
        }
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use pretty_assertions::assert_eq;

    fn enums(entries: &[(&str, &str, &[&str])]) -> EnumConfig {
        let mut values: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();
        for (entity, field, members) in entries {
            values.entry((*entity).to_string()).or_default().insert(
                (*field).to_string(),
                members.iter().map(ToString::to_string).collect(),
            );
        }
        EnumConfig { values }
    }

    #[test]
    fn configured_members_resolve_builtin_enums() {
        let mut registry = community_schema().unwrap();
        let config = enums(&[
            ("user", "role", &["member", "owner"][..]),
            ("Subscription", "plan", &["free", "pro"][..]),
        ]);
        assert_eq!(apply_configured_enums(&mut registry, &config).unwrap(), 2);
        assert!(registry.validate().is_valid());
    }

    #[test]
    fn unknown_targets_are_skipped() {
        let mut registry = community_schema().unwrap();
        let config = enums(&[
            ("Invoice", "status", &["open"][..]),
            ("User", "mood", &["calm"][..]),
        ]);
        assert_eq!(apply_configured_enums(&mut registry, &config).unwrap(), 0);
    }

    #[test]
    fn non_enum_field_is_an_error() {
        let mut registry = community_schema().unwrap();
        let config = enums(&[("User", "email", &["a"][..])]);
        assert!(apply_configured_enums(&mut registry, &config).is_err());
    }
}
