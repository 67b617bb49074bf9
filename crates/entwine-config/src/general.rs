//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Treat validation warnings as failures in `entwine check`.
    #[serde(default)]
    pub strict: bool,
}
