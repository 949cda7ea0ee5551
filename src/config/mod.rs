#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::cart::DEFAULT_STORAGE_KEY;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:3333";
pub const DEFAULT_STORAGE_PATH: &str = "./.cart";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Resolved settings: built-in defaults, then the TOML file, then flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSettings {
    pub api_endpoint: String,
    pub storage_path: String,
    pub storage_key: String,
    pub timeout_seconds: u64,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            storage_path: DEFAULT_STORAGE_PATH.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            verbose: false,
            json_logs: false,
        }
    }
}

impl CartSettings {
    pub fn apply_toml(mut self, config: &TomlConfig) -> Self {
        if let Some(endpoint) = config.api_endpoint() {
            self.api_endpoint = endpoint.to_string();
        }
        if let Some(timeout) = config.timeout_seconds() {
            self.timeout_seconds = timeout;
        }
        if let Some(path) = config.storage_path() {
            self.storage_path = path.to_string();
        }
        if let Some(key) = config.storage_key() {
            self.storage_key = key.to_string();
        }
        if let Some(verbose) = config.verbose() {
            self.verbose = verbose;
        }
        if let Some(json) = config.json_logs() {
            self.json_logs = json;
        }
        self
    }
}

/// What the adapters read when they are built from settings.
impl ConfigProvider for CartSettings {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn storage_path(&self) -> &str {
        &self.storage_path
    }

    fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for CartSettings {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_path("storage_path", &self.storage_path)?;
        validate_non_empty_string("storage_key", &self.storage_key)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;

        tracing::debug!("✅ Cart configuration validation passed");
        Ok(())
    }
}
