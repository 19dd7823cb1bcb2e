use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config file path.
pub const CONFIG_PATH: &str = "config.toml";

/// Top-level application config deserialized from `config.toml`.
///
/// The file is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Network slug used for the listing endpoint and the id prefix filter.
    #[serde(default = "default_network")]
    pub network: String,
    /// Path of the processed-token store file.
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Per-request timeout for both upstream APIs.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_network() -> String {
    crate::DEFAULT_NETWORK.to_string()
}

fn default_state_file() -> String {
    "processed_tokens.json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            state_file: default_state_file(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}
