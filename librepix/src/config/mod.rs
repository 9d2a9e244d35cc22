//! Application configuration.
//!
//! This module manages application configuration with sensible defaults,
//! loading from a YAML file and merging with `REPIX_`-prefixed environment
//! variables. Access tokens are never read from or written to this file.

use crate::client::{ClientConfig, DEFAULT_API_URL, default_user_agent};
use crate::error::{RepixError, Result};
use config::{Config as ConfigRs, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;


/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub github: Github,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub output: Output,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    ///
    /// This function is primarily used for testing.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults_builder()?.add_source(File::from_str(s, FileFormat::Yaml));
        Self::from_builder(builder)
    }

    /// Loads a `Config` from an optional file path, then applies environment overrides.
    ///
    /// Without a path, the default location is used if a file exists there.
    /// An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults_builder()?;

        match path {
            Some(p) => builder = builder.add_source(File::from(p).required(true)),
            None => {
                if let Some(default_path) = default_config_path() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("REPIX")
                .prefix_separator("_")
                .separator("__"),
        );

        Self::from_builder(builder)
    }

    /// Starts a builder seeded with the default values.
    fn defaults_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            RepixError::config_with_source("Failed to build default configuration", None, e)
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    /// Creates a `Config` from a `config::ConfigBuilder`.
    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                RepixError::config_with_source("Failed to deserialize configuration", None, e)
            })
    }

    /// HTTP client settings derived from this configuration.
    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::new()
            .with_api_url(self.github.api_url.clone())
            .with_user_agent(self.network.user_agent.clone());
        if let Some(seconds) = self.network.timeout {
            client = client.with_timeout(seconds);
        }
        client
    }
}

/// Default config file location: `<config dir>/repix/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("repix").join("config.yaml"))
}

/// Repository coordinates. The token is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Github {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub repository: String,

    #[serde(default)]
    pub folder: String,
}

impl Default for Github {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            owner: String::new(),
            repository: String::new(),
            folder: String::new(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Request timeout in seconds; none waits indefinitely
    #[serde(default)]
    pub timeout: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Session behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSettings {
    /// Delay before the listing refresh that follows an upload
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,

    /// How long a status message stays visible
    #[serde(default = "default_status_ttl_secs")]
    pub status_ttl_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            refresh_delay_ms: default_refresh_delay_ms(),
            status_ttl_secs: default_status_ttl_secs(),
        }
    }
}

impl SessionSettings {
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_secs)
    }
}

fn default_refresh_delay_ms() -> u64 {
    500
}

fn default_status_ttl_secs() -> u64 {
    5
}

/// Output formatting settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Output {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub color: ColorChoice,
}

/// Enum for output formats.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,

    Json,

    Yaml,
}

/// Enum for color output choices.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,

    Always,

    Never,
}
