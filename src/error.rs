//! Error types for RelayChat
//!
//! This module defines the error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.
//!
//! Exchange failures are not errors: they are reported as
//! [`ExchangeOutcome`](crate::exchange::ExchangeOutcome) values so the chat
//! view can render them as transcript lines.

use thiserror::Error;

/// Main error type for RelayChat operations
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (client construction, malformed responses)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Authentication errors (rejected API key)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A chat exchange failed
    #[error("Exchange failed: {0}")]
    Exchange(String),

    /// The key store could not be read or written
    ///
    /// Never fatal: reads degrade to "no stored credential" and writes are
    /// best-effort.
    #[error("Key store unavailable: {0}")]
    StorageUnavailable(String),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for RelayChat operations
///
/// Uses `anyhow::Error` so callers can attach context while propagating.
pub type Result<T> = anyhow::Result<T>;
