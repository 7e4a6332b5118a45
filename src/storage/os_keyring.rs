//! Key store backed by the OS native keyring
//!
//! Entries live in the operating system's credential store (Keychain on
//! macOS, Secret Service on Linux, Windows Credential Manager on Windows)
//! under a configurable service name. The keyring commits each write
//! immediately, so [`KeyStore::flush`] has nothing to do.

use async_trait::async_trait;

use super::KeyStore;
use crate::error::{Result, RelayError};

/// Stateless accessor for the OS keyring
///
/// # Examples
///
/// ```no_run
/// use relaychat::storage::{KeyStore, KeyringStore, API_KEY_NAME};
///
/// # async fn example() -> relaychat::error::Result<()> {
/// let store = KeyringStore::new("relaychat");
/// store.set(API_KEY_NAME, "sk-example").await?;
/// assert!(store.get(API_KEY_NAME).await?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Creates an accessor for the given keyring service name
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Keyring service name used for all entries
    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, name: &str) -> Result<::keyring::Entry> {
        ::keyring::Entry::new(&self.service, name)
            .map_err(|e| RelayError::StorageUnavailable(e.to_string()).into())
    }
}

#[async_trait]
impl KeyStore for KeyringStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        match self.entry(name)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(::keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(RelayError::Keyring(e).into()),
        }
    }

    async fn set(&self, name: &str, value: &str) -> Result<()> {
        self.entry(name)?
            .set_password(value)
            .map_err(RelayError::Keyring)?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        match self.entry(name)?.delete_password() {
            Ok(()) => Ok(()),
            Err(::keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(RelayError::Keyring(e).into()),
        }
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
