//! Enum member lists supplied by configuration.
//!
//! Enum fields declared without members are completed from here:
//!
//! ```toml
//! [enums.User]
//! role = ["member", "moderator", "owner"]
//!
//! [enums.Subscription]
//! plan = ["free", "pro"]
//! ```
//!
//! Environment variables lowercase their keys (`ENTWINE_ENUMS__USER__ROLE`
//! arrives as `enums.user.role`), so lookups and [`EnumConfig::overlay`]
//! ignore ASCII case.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EnumConfig {
    /// Entity name -> field name -> members.
    pub values: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl EnumConfig {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.values().all(BTreeMap::is_empty)
    }

    /// Members configured for `entity.field`, matched case-insensitively.
    #[must_use]
    pub fn values_for(&self, entity: &str, field: &str) -> Option<&[String]> {
        self.values
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(entity))
            .and_then(|(_, fields)| {
                fields
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(field))
            })
            .map(|(_, members)| members.as_slice())
    }

    /// Layer `other` over `self`. Entity and field names match ignoring
    /// ASCII case; an overridden entity keeps its existing spelling.
    pub fn overlay(&mut self, other: Self) {
        for (entity, fields) in other.values {
            let key = self
                .values
                .keys()
                .find(|name| name.eq_ignore_ascii_case(&entity))
                .cloned()
                .unwrap_or(entity);
            let target = self.values.entry(key).or_default();
            for (field, members) in fields {
                target.retain(|name, _| !name.eq_ignore_ascii_case(&field));
                target.insert(field, members);
            }
        }
    }

    /// Every configured `(entity, field, members)` triple.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.values.iter().flat_map(|(entity, fields)| {
            fields
                .iter()
                .map(move |(field, members)| (entity.as_str(), field.as_str(), members.as_slice()))
        })
    }

    /// Reject empty member lists and repeated members.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending `enums.*` key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (entity, field, members) in self.entries() {
            let key = format!("enums.{entity}.{field}");
            if members.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: key,
                    reason: "member list is empty".to_string(),
                });
            }

            let mut seen = HashSet::new();
            for member in members {
                if member.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: key,
                        reason: "member names must not be blank".to_string(),
                    });
                }
                if !seen.insert(member.as_str()) {
                    return Err(ConfigError::InvalidValue {
                        field: key,
                        reason: format!("member '{member}' is listed twice"),
                    });
                }
            }
        }
        Ok(())
    }
}
