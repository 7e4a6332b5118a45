//! Command-line interface definition for RelayChat
//!
//! This module defines the CLI structure using clap's derive API.

use crate::config::StorageBackend;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// RelayChat - chat with an OpenAI-compatible model from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "relaychat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the key store backend
    #[arg(long, value_enum)]
    pub storage: Option<StorageBackend>,

    /// Override the key store file (file backend)
    #[arg(long)]
    pub storage_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for RelayChat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Validate an API key and optionally remember it
    Login {
        /// API key; prompted for when omitted
        #[arg(short, long)]
        key: Option<String>,

        /// Do not save the key to the key store
        #[arg(long)]
        no_remember: bool,
    },

    /// Forget the remembered API key
    Logout,

    /// Send a single message and print the reply
    Send {
        /// Message text
        text: String,
    },

    /// Show whether an API key is available and where it comes from
    Status,
}

impl ValueEnum for StorageBackend {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Keyring, Self::File, Self::Memory]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Keyring => clap::builder::PossibleValue::new("keyring"),
            Self::File => clap::builder::PossibleValue::new("file"),
            Self::Memory => clap::builder::PossibleValue::new("memory"),
        })
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_chat() {
        let cli = Cli::try_parse_from(["relaychat", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_login_flags() {
        let cli =
            Cli::try_parse_from(["relaychat", "login", "--key", "sk-x", "--no-remember"]).unwrap();
        match cli.command {
            Commands::Login { key, no_remember } => {
                assert_eq!(key.as_deref(), Some("sk-x"));
                assert!(no_remember);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_send() {
        let cli = Cli::try_parse_from(["relaychat", "send", "hello world"]).unwrap();
        match cli.command {
            Commands::Send { text } => assert_eq!(text, "hello world"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_storage_override() {
        let cli = Cli::try_parse_from([
            "relaychat",
            "--storage",
            "file",
            "--storage-path",
            "/tmp/store.json",
            "status",
        ])
        .unwrap();
        assert_eq!(cli.storage, Some(StorageBackend::File));
        assert_eq!(cli.storage_path, Some(PathBuf::from("/tmp/store.json")));
    }

    #[test]
    fn test_cli_default_config_path() {
        let cli = Cli::try_parse_from(["relaychat", "status"]).unwrap();
        assert_eq!(cli.config, "config/config.yaml");
        assert_eq!(cli.storage, None);
        assert_eq!(cli.storage_path, None);
    }

    #[test]
    fn test_cli_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["relaychat", "--storage", "sqlite", "status"]).is_err());
    }
}
