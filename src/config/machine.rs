//! Machine configuration document.
//!
//! The document shape is
//! `{"machine":{"outlets":{"count_n":N},"total_items_quantity":{..},"beverages":{..}}}`
//! with an optional `machine.brew_duration_ms`.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::machine::DEFAULT_BREW_DURATION;
use crate::core::registry::Requirements;

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_ENV: &str = "COFFEE_MACHINE_CONFIG";
/// Environment variable overriding the brewing time in milliseconds.
pub const BREW_MS_ENV: &str = "COFFEE_MACHINE_BREW_MS";

/// Outlet section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutletConfig {
    /// Number of parallel outlets.
    pub count_n: u32,
}

/// Machine section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Outlet settings.
    pub outlets: OutletConfig,
    /// Initial stock per ingredient.
    pub total_items_quantity: HashMap<String, u32>,
    /// Recipe per beverage, requirements in declared order.
    pub beverages: HashMap<String, Requirements>,
    /// Simulated brewing time; defaults to one second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brew_duration_ms: Option<u64>,
}

/// Root configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The single machine this document describes.
    pub machine: MachineConfig,
}

impl MachineConfig {
    /// Validate machine values.
    ///
    /// # Errors
    ///
    /// Fails on zero outlets, empty recipes, or zero required quantities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.outlets.count_n == 0 {
            return Err(ConfigError::Invalid("outlets.count_n must be greater than 0".into()));
        }
        for (beverage, reqs) in &self.beverages {
            if reqs.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "beverage `{beverage}` has no ingredients"
                )));
            }
            if let Some((ingredient, _)) = reqs.iter().find(|(_, qty)| *qty == 0) {
                return Err(ConfigError::Invalid(format!(
                    "beverage `{beverage}` requires zero `{ingredient}`"
                )));
            }
        }
        Ok(())
    }

    /// Configured brewing time, or the default.
    pub fn brew_duration(&self) -> Duration {
        self.brew_duration_ms
            .map_or(DEFAULT_BREW_DURATION, Duration::from_millis)
    }
}

impl Config {
    /// Validate the document.
    ///
    /// # Errors
    ///
    /// See [`MachineConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.machine.validate()
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json_str(&input)
    }

    /// Load from the file named by `COFFEE_MACHINE_CONFIG`, honoring a
    /// `COFFEE_MACHINE_BREW_MS` override. A `.env` file is read first if
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] when the path variable is unset and
    /// [`ConfigError::Invalid`] when the override is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_PATH_ENV).map_err(|_| ConfigError::MissingEnv(CONFIG_PATH_ENV))?;
        let mut cfg = Self::from_path(&path)?;
        if let Ok(raw) = std::env::var(BREW_MS_ENV) {
            let ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::Invalid(format!("{BREW_MS_ENV}={raw}: {e}")))?;
            cfg.machine.brew_duration_ms = Some(ms);
        }
        tracing::debug!(path = %path, outlets = cfg.machine.outlets.count_n, "loaded machine config");
        Ok(cfg)
    }
}
