//! # entwine-config
//!
//! Layered configuration loading for entwine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ENTWINE_*` prefix, `__` as separator)
//! 2. An explicit config file (`--config`), or else the project-level
//!    `.entwine/config.toml`
//! 3. User-level `~/.config/entwine/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ENTWINE_CODEGEN__OUT_DIR` -> `codegen.out_dir` and
//! `ENTWINE_ENUMS__USER__ROLE=[member,owner]` -> `enums.user.role`.
//!
//! # Usage
//!
//! ```no_run
//! use entwine_config::EntwineConfig;
//!
//! let config = EntwineConfig::load_with_dotenv().expect("config");
//! if let Some(roles) = config.enums.values_for("User", "role") {
//!     println!("roles: {roles:?}");
//! }
//! ```

mod codegen;
mod enums;
mod error;
mod general;

pub use codegen::CodegenConfig;
pub use enums::EnumConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for all entwine settings.
pub const ENV_PREFIX: &str = "ENTWINE_";

/// Project-local config file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".entwine/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EntwineConfig {
    #[serde(default)]
    pub enums: EnumConfig,
    #[serde(default)]
    pub codegen: CodegenConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl EntwineConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse or extract,
    /// and `ConfigError::InvalidValue` if the enum lists are malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(None)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Load configuration with an explicit config file in place of the
    /// project-local one. Environment variables still take precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFile` if `path` does not exist, plus the
    /// errors of [`Self::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        Self::load_dotenv();
        Self::extract(Some(path))
    }

    /// Build the default figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with(None)
    }

    /// Build the provider chain, using `explicit` instead of the
    /// project-local file when given.
    #[must_use]
    pub fn figment_with(explicit: Option<&Path>) -> Figment {
        Self::merged(Self::layers(explicit))
    }

    fn merged(layers: impl IntoIterator<Item = Figment>) -> Figment {
        layers
            .into_iter()
            .fold(Figment::from(Serialized::defaults(Self::default())), Figment::merge)
    }

    /// The configuration sources above the defaults, lowest priority first.
    fn layers(explicit: Option<&Path>) -> Vec<Figment> {
        let mut layers = Vec::with_capacity(3);

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                tracing::debug!(path = %global_path.display(), "merging user config");
                layers.push(Figment::from(Toml::file(global_path)));
            }
        }

        // Layer 2: Explicit or project-local config
        let local_path = explicit.map_or_else(|| PathBuf::from(PROJECT_CONFIG_PATH), Path::to_path_buf);
        if local_path.exists() {
            tracing::debug!(path = %local_path.display(), "merging project config");
            layers.push(Figment::from(Toml::file(local_path)));
        }

        // Layer 3: Environment variables (highest priority)
        layers.push(Figment::from(Env::prefixed(ENV_PREFIX).split("__")));
        layers
    }

    /// Extract the merged configuration.
    ///
    /// Environment keys arrive lowercased, so `[enums.User]` and
    /// `ENTWINE_ENUMS__USER__*` land under different figment keys. Enum
    /// sections are therefore overlaid one layer at a time, matching entity
    /// and field names case-insensitively.
    fn extract(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let layers = Self::layers(explicit);
        let mut config: Self = Self::merged(layers.iter().cloned()).extract()?;

        config.enums = EnumConfig::default();
        for layer in &layers {
            let section: EnumSection = layer.extract()?;
            config.enums.overlay(section.enums);
        }

        config.enums.validate()?;
        Ok(config)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("entwine").join("config.toml"))
    }

    /// Load `.env` from the current directory. Silently does nothing if no
    /// `.env` is found.
    fn load_dotenv() {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
    }
}

/// The `enums` table of a single layer; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct EnumSection {
    #[serde(default)]
    enums: EnumConfig,
}
