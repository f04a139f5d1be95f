//! Configuration management for hanspell
//!
//! Handles loading and parsing of the `hanspell.toml` configuration file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::extractor::Format;

/// Endpoint of the markup upstream
pub const PUSAN_ENDPOINT: &str = "https://speller.cs.pusan.ac.kr/results";

/// Environment variable overriding the configured endpoint
pub const ENDPOINT_ENV: &str = "HANSPELL_ENDPOINT";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Speller service settings
    #[serde(default)]
    pub speller: SpellerConfig,
}

/// Speller service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellerConfig {
    /// Response format of the upstream: "embedded-json" or "direct-json"
    #[serde(default)]
    pub format: Format,

    /// Service URL (defaults depend on the format)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Form field carrying the text
    #[serde(default = "default_form_field")]
    pub form_field: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SpellerConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            endpoint: None,
            form_field: default_form_field(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_form_field() -> String {
    "text1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; hanspell-rs/{})",
        env!("CARGO_PKG_VERSION")
    )
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "hanspell")
            .map(|dirs| dirs.config_dir().join("hanspell.toml"))
    }

    /// Load configuration from the working directory or the user config dir
    pub fn load_from_default() -> Self {
        let workspace_path = PathBuf::from("hanspell.toml");
        if workspace_path.exists() {
            match Self::load(&workspace_path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Ignoring {}: {}", workspace_path.display(), e),
            }
        }

        if let Some(default_path) = Self::default_path() {
            if let Ok(config) = Self::load(&default_path) {
                return config;
            }
        }

        Config::default()
    }
}

impl SpellerConfig {
    /// Get the effective endpoint (environment, then file, then format default)
    pub fn get_endpoint(&self) -> Option<String> {
        self.resolve_endpoint(std::env::var(ENDPOINT_ENV).ok())
    }

    /// Resolve the endpoint against an override value (non-empty wins)
    pub fn resolve_endpoint(&self, override_url: Option<String>) -> Option<String> {
        match override_url {
            Some(url) if !url.is_empty() => Some(url),
            _ => self.endpoint_or_default(),
        }
    }

    fn endpoint_or_default(&self) -> Option<String> {
        if let Some(ref url) = self.endpoint {
            if !url.is_empty() {
                return Some(url.clone());
            }
        }

        match self.format {
            Format::EmbeddedJson => Some(PUSAN_ENDPOINT.to_string()),
            Format::DirectJson => None,
        }
    }
}
