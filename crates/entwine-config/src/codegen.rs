//! Code generation output settings.

use serde::{Deserialize, Serialize};

fn default_out_dir() -> String {
    "ent/schema".to_string()
}

fn default_package() -> String {
    "schema".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodegenConfig {
    /// Directory the generated schema sources are written to.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Go package name of the generated sources.
    #[serde(default = "default_package")]
    pub package: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            package: default_package(),
        }
    }
}
