//! Configuration management for RelayChat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::credential::Credential;
use crate::error::{Result, RelayError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for RelayChat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion endpoint settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Key store settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chat view settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Completion endpoint configuration
///
/// `model`, `max_tokens` and `temperature` are fixed for the lifetime of a
/// client; they are never varied per message.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible API (without trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every completion request
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on generated tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Transport timeout for HTTP requests (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Deploy-time API key; used transiently and never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            api_key: None,
        }
    }
}

// Hand-written so the configured key never ends up in debug logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Key store backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// OS native credential store (Keychain, Secret Service, Credential Manager)
    #[default]
    Keyring,
    /// JSON file under the user's config directory
    File,
    /// Process-local map; nothing survives a restart
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = RelayError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyring" => Ok(Self::Keyring),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(RelayError::Config(format!(
                "Invalid storage backend: {}. Must be one of: keyring, file, memory",
                other
            ))),
        }
    }
}

/// Key store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend holds the remembered key
    #[serde(default)]
    pub backend: StorageBackend,

    /// Store file for the `file` backend; defaults to the platform config dir
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Keyring service name for the `keyring` backend
    #[serde(default = "default_keyring_service")]
    pub service: String,
}

fn default_keyring_service() -> String {
    "relaychat".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            service: default_keyring_service(),
        }
    }
}

impl StorageConfig {
    /// Resolves the store file used by the `file` backend
    ///
    /// Uses the explicit `path` when set, otherwise
    /// `<platform config dir>/relaychat/store.json`.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        directories::ProjectDirs::from("", "", "relaychat")
            .map(|dirs| dirs.config_dir().join("store.json"))
    }
}

/// Transcript colour scheme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Dark text accents for light terminals
    #[default]
    Light,
    /// Bright accents for dark terminals
    Dark,
}

impl std::str::FromStr for Theme {
    type Err = RelayError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(RelayError::Config(format!(
                "Invalid theme: {}. Must be one of: light, dark",
                other
            ))),
        }
    }
}

/// Chat view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Prefix transcript lines with an `HH:MM` timestamp
    #[serde(default = "default_show_timestamps")]
    pub show_timestamps: bool,

    /// Colour scheme
    #[serde(default)]
    pub theme: Theme,
}

fn default_show_timestamps() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            show_timestamps: default_show_timestamps(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::info!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| RelayError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_key) = std::env::var("RELAYCHAT_API_KEY") {
            tracing::debug!("Env override: RELAYCHAT_API_KEY");
            self.api.api_key = Some(api_key);
        }

        if let Ok(base_url) = std::env::var("RELAYCHAT_API_BASE") {
            tracing::debug!(base_url = %base_url, "Env override: RELAYCHAT_API_BASE");
            self.api.base_url = base_url;
        }

        if let Ok(model) = std::env::var("RELAYCHAT_MODEL") {
            tracing::debug!(model = %model, "Env override: RELAYCHAT_MODEL");
            self.api.model = model;
        }

        if let Ok(backend) = std::env::var("RELAYCHAT_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(b) => self.storage.backend = b,
                Err(_) => tracing::warn!("Invalid RELAYCHAT_STORAGE_BACKEND: {}", backend),
            }
        }

        if let Ok(path) = std::env::var("RELAYCHAT_STORAGE_PATH") {
            tracing::debug!(path = %path, "Env override: RELAYCHAT_STORAGE_PATH");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(theme) = std::env::var("RELAYCHAT_THEME") {
            match theme.parse() {
                Ok(t) => self.chat.theme = t,
                Err(_) => tracing::warn!("Invalid RELAYCHAT_THEME: {}", theme),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(backend) = cli.storage {
            self.storage.backend = backend;
        }
        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(path.clone());
        }
    }

    /// Returns the deploy-time key, if one is configured
    ///
    /// Blank values and the placeholder shipped in example configs are
    /// ignored.
    pub fn configured_credential(&self) -> Option<Credential> {
        self.api
            .api_key
            .as_deref()
            .and_then(Credential::from_configured)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(RelayError::Config("api.base_url cannot be empty".to_string()).into());
        }

        if self.api.model.trim().is_empty() {
            return Err(RelayError::Config("api.model cannot be empty".to_string()).into());
        }

        if self.api.max_tokens == 0 {
            return Err(
                RelayError::Config("api.max_tokens must be greater than 0".to_string()).into(),
            );
        }

        if !(0.0..=2.0).contains(&self.api.temperature) {
            return Err(RelayError::Config(
                "api.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(RelayError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.storage.backend == StorageBackend::File && self.storage.resolved_path().is_none() {
            return Err(RelayError::Config(
                "storage.path must be set: no platform config directory available".to_string(),
            )
            .into());
        }

        if self.storage.backend == StorageBackend::Keyring && self.storage.service.is_empty() {
            return Err(
                RelayError::Config("storage.service cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}
