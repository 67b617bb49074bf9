//! Compiler form of a registry.
//!
//! A `SchemaBundle` is what an external schema compiler consumes: a version
//! tag and the ordered entity descriptors. It is encoded as JSON or TOML and
//! its own JSON Schema is available through [`SchemaBundle::json_schema`].

use std::path::Path;

use entwine_core::EntityDescriptor;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Current compiler-form version.
pub const BUNDLE_VERSION: u32 = 1;

/// Default bundle version for files written without a `version` key.
const fn default_bundle_version() -> u32 {
    BUNDLE_VERSION
}

/// Serialized registry handed to the schema compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaBundle {
    /// Compiler-form version. Defaults to 1 when absent.
    #[serde(default = "default_bundle_version")]
    pub version: u32,

    /// Entity descriptors in declaration order.
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
}

/// Text encodings of the compiler form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BundleFormat {
    Json,
    Toml,
}

impl BundleFormat {
    /// Pick the encoding from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnsupportedFormat` for anything but `.json` and
    /// `.toml`.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(SchemaError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl SchemaBundle {
    /// Encode as pretty-printed text in `format`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Encode` if serialization fails.
    pub fn encode(&self, format: BundleFormat) -> Result<String, SchemaError> {
        match format {
            BundleFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| SchemaError::Encode(e.to_string()))
            }
            BundleFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| SchemaError::Encode(e.to_string()))
            }
        }
    }

    /// Decode from text in `format`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Decode` if the text does not parse into a bundle.
    pub fn decode(text: &str, format: BundleFormat) -> Result<Self, SchemaError> {
        match format {
            BundleFormat::Json => {
                serde_json::from_str(text).map_err(|e| SchemaError::Decode(e.to_string()))
            }
            BundleFormat::Toml => toml::from_str(text).map_err(|e| SchemaError::Decode(e.to_string())),
        }
    }

    /// JSON Schema describing the compiler form itself.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Encode` if the generated schema cannot be
    /// converted to a JSON value.
    pub fn json_schema() -> Result<serde_json::Value, SchemaError> {
        serde_json::to_value(schema_for!(SchemaBundle)).map_err(|e| SchemaError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_version_defaults_to_one() {
        let bundle = SchemaBundle::decode(r#"{"entities": []}"#, BundleFormat::Json).unwrap();
        assert_eq!(bundle.version, 1);
        assert!(bundle.entities.is_empty());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            BundleFormat::from_path(Path::new("schema.json")).unwrap(),
            BundleFormat::Json
        );
        assert_eq!(
            BundleFormat::from_path(Path::new("dir/schema.TOML")).unwrap(),
            BundleFormat::Toml
        );
        assert!(matches!(
            BundleFormat::from_path(Path::new("schema.yaml")),
            Err(SchemaError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn malformed_text_is_a_decode_error() {
        assert!(matches!(
            SchemaBundle::decode("entities = [", BundleFormat::Toml),
            Err(SchemaError::Decode(_))
        ));
    }

    #[test]
    fn bundle_schema_describes_entities() {
        let schema = SchemaBundle::json_schema().unwrap();
        assert!(schema["properties"]["entities"].is_object());
        assert!(schema["properties"]["version"].is_object());
    }
}
