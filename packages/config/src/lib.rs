#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Configuration for the water map toolchain.
//!
//! Settings are resolved in three layers, later layers winning:
//!
//! 1. Defaults embedded at compile time from `config/default.toml`.
//! 2. An optional user TOML file (partial; only the keys it sets are
//!    replaced).
//! 3. Environment variables (see [`ENV_OVERRIDES`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Defaults embedded at compile time.
const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// File name of the key-value store inside [`Config::data_dir`].
pub const STORAGE_FILE_NAME: &str = "storage.toml";

/// Environment variable that points at a user configuration file.
pub const CONFIG_PATH_ENV: &str = "WATER_MAP_CONFIG";

/// Environment variables recognized as overrides, with what they set.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("WATER_MAP_DATA_DIR", "data_dir"),
    ("WATER_MANAGER_URL", "water_manager.base_url"),
    ("WATER_MAP_PRODUCT_ID", "water_manager.product_id"),
    ("WATER_MAP_VENDOR_ID", "water_manager.vendor_id"),
    ("WATER_MAP_AUTH_URL", "auth.base_url"),
    ("GEOCODER_URL", "geocoder.base_url"),
    ("GEOCODER_API_KEY", "geocoder.api_key"),
];

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A TOML layer is malformed or has the wrong shape.
    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("Invalid config value: {message}")]
    Invalid {
        /// Which value is wrong and why.
        message: String,
    },
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the persisted key-value store.
    pub data_dir: PathBuf,
    /// `WaterManager` data service settings.
    pub water_manager: WaterManagerConfig,
    /// Login service settings.
    pub auth: AuthConfig,
    /// Geocoding service settings.
    pub geocoder: GeocoderConfig,
}

/// Settings for the `WaterManager` data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterManagerConfig {
    /// Scheme and host, without the `/WaterManager` path.
    pub base_url: String,
    /// Product identifier scoping every request.
    pub product_id: String,
    /// Vendor identifier sent with inserts.
    pub vendor_id: String,
    /// Maximum number of records per fetch.
    pub result_limit: u32,
    /// Length of the rolling fetch window in months.
    pub window_months: u32,
}

/// Settings for the login service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Scheme and host, without the `/api/login` path.
    pub base_url: String,
    /// Key under which the session token is persisted.
    pub token_key: String,
}

/// Settings for the geocoding service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Scheme and host, without the `/geocode/v1/json` path.
    pub base_url: String,
    /// API key. Address submission is unavailable without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Weight attached to points added by address.
    pub default_weight: f64,
}

impl Config {
    /// Path of the persisted key-value store.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE_NAME)
    }

    /// Loads configuration from the embedded defaults, the file at `path`
    /// (or at `$WATER_MAP_CONFIG` when `path` is `None`), and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, any layer fails
    /// to parse, or a resolved value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let path = path.or(env_path.as_deref());
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] but with an explicit file path and
    /// environment lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut table: toml::Table = DEFAULT_TOML.parse()?;

        if let Some(path) = path {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let overlay: toml::Table = text.parse()?;
            merge_tables(&mut table, overlay);
            log::debug!("Loaded config overrides from {}", path.display());
        }

        let mut config: Self = toml::Value::Table(table).try_into()?;
        config.apply_env(env);
        config.validate()?;

        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for &(var, key) in ENV_OVERRIDES {
            let Some(value) = env(var).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            log::debug!("Overriding {key} from ${var}");
            match key {
                "data_dir" => self.data_dir = PathBuf::from(value),
                "water_manager.base_url" => self.water_manager.base_url = value,
                "water_manager.product_id" => self.water_manager.product_id = value,
                "water_manager.vendor_id" => self.water_manager.vendor_id = value,
                "auth.base_url" => self.auth.base_url = value,
                "geocoder.base_url" => self.geocoder.base_url = value,
                "geocoder.api_key" => self.geocoder.api_key = Some(value),
                _ => {}
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.water_manager.result_limit == 0 {
            return Err(ConfigError::Invalid {
                message: "water_manager.result_limit must be at least 1".to_string(),
            });
        }
        if self.water_manager.window_months == 0 {
            return Err(ConfigError::Invalid {
                message: "water_manager.window_months must be at least 1".to_string(),
            });
        }
        if !(self.geocoder.default_weight.is_finite() && self.geocoder.default_weight > 0.0) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "geocoder.default_weight must be positive, got {}",
                    self.geocoder.default_weight
                ),
            });
        }
        if self.auth.token_key.is_empty() {
            return Err(ConfigError::Invalid {
                message: "auth.token_key must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Recursively merges `overlay` into `base`. Nested tables merge key by
/// key; any other value replaces the base value.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) =
            (base.get_mut(&key), &value)
        {
            merge_tables(existing, incoming.clone());
            continue;
        }
        base.insert(key, value);
    }
}
