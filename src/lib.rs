//! RelayChat - terminal chat client library
//!
//! This library authenticates a user with an API key, optionally remembers
//! the key in a persistent key store, and relays single messages to an
//! OpenAI-compatible completion endpoint.
//!
//! # Architecture
//!
//! - `storage`: key store trait and backends (OS keyring, JSON file, memory)
//! - `session`: startup credential resolution and the session state machine
//! - `exchange`: one-message request/response cycle with typed outcomes
//! - `conversation`: append-only transcript shown by the UI
//! - `client`: composition root used by the terminal UI
//! - `providers`: completion endpoint abstraction and the OpenAI implementation
//! - `config`, `error`, `cli`, `commands`: ambient plumbing and the UI layer
//!
//! # Example
//!
//! ```no_run
//! use relaychat::{ChatClient, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let mut client = ChatClient::from_config(&config)?;
//!     if client.resolve_startup_credential().await.is_none() {
//!         client.login("sk-...", true).await;
//!     }
//!     let outcome = client.send_message("Hello!").await;
//!     println!("{}", outcome.user_message());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod credential;
pub mod error;
pub mod exchange;
pub mod providers;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use client::ChatClient;
pub use config::Config;
pub use credential::Credential;
pub use error::{RelayError, Result};
pub use exchange::{ExchangeOutcome, FailureCategory};
pub use session::{LoginOutcome, SessionState};

#[cfg(test)]
pub mod test_utils;
