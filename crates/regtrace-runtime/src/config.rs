use crate::Result;
use regtrace_providers::{Provider, ProviderRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the project root
pub const CONFIG_FILE: &str = "regtrace.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Default provider when a request carries no target header
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Base URL of the optional custom endpoint
    #[serde(default)]
    pub base_url: String,

    /// Model hint for scaffolded suites; informational only
    #[serde(default)]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalsConfig {
    /// Directory holding the test suite (`<path>/tests.toml`)
    #[serde(default = "default_evals_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub project: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub evals: EvalsConfig,
}

fn default_version() -> String {
    "1".to_string()
}

fn default_provider_type() -> String {
    "openai".to_string()
}

fn default_evals_path() -> String {
    "evals".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            base_url: String::new(),
            model: String::new(),
        }
    }
}

impl Default for EvalsConfig {
    fn default() -> Self {
        Self {
            path: default_evals_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            project: String::new(),
            provider: ProviderConfig::default(),
            evals: EvalsConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a file. A missing or malformed file is not fatal:
    /// the caller receives defaults and a warning is logged, per the policy
    /// that only resource-acquisition failures stop a run.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "config not loaded, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Build the provider registry this config describes
    pub fn registry(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        if !self.provider.base_url.is_empty() {
            registry = registry.with_custom_endpoint(self.provider.base_url.clone());
        }
        if let Some(default) = Provider::from_name(&self.provider.provider_type) {
            registry = registry.with_default_provider(default);
        }
        registry
    }
}
