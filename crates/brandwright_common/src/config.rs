//! Configuration management for brandwrightd.
//!
//! Loads settings from $BRANDWRIGHT_CONFIG or /etc/brandwright/config.toml,
//! falling back to defaults. Provider credentials come from the environment.

use crate::llm_client::ProviderConfig;
use crate::types::FeatureFlags;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/brandwright/config.toml";

/// Environment variable that overrides the config path
pub const CONFIG_ENV: &str = "BRANDWRIGHT_CONFIG";

/// Credential variables, checked in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Whole-request timeout, provider call included
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "127.0.0.1:7870".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Defaults applied to extended-mode requests that omit a flag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub default_genai_structure: bool,

    #[serde(default)]
    pub default_simulate_prompt: bool,
}

impl GenerationConfig {
    pub fn feature_defaults(&self) -> FeatureFlags {
        FeatureFlags {
            enable_genai_structure: self.default_genai_structure,
            simulate_prompt: self.default_simulate_prompt,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Config {
    /// Load config from $BRANDWRIGHT_CONFIG, then the default path, then defaults
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_PATH.to_string());
        Self::load_from_path(&path).unwrap_or_else(|e| {
            warn!("Config not loaded from {}, using defaults: {}", path, e);
            Config::default()
        })
    }

    /// Load config from specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the provider credential from the process environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolve the provider credential with an injectable lookup.
    ///
    /// Order: GOOGLE_API_KEY, GEMINI_API_KEY, then `provider.api_key`.
    /// Blank values count as missing.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .chain(self.provider.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }
}
