//! Persistent key store for the remembered API key
//!
//! The [`KeyStore`] trait is an asynchronous string map with explicit
//! flush semantics. Three backends are provided:
//!
//! - [`KeyringStore`]: the OS credential store (encrypted at rest)
//! - [`FileKeyStore`]: a JSON map file, written on [`KeyStore::flush`]
//! - [`MemoryKeyStore`]: process-local, used by tests and ephemeral runs
//!
//! Only the session manager writes the API key record; everything else
//! reads through [`API_KEY_NAME`].

pub mod file;
pub mod os_keyring;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{Result, RelayError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub use self::file::FileKeyStore;
pub use self::os_keyring::KeyringStore;

/// Entry name under which the remembered API key is stored
pub const API_KEY_NAME: &str = "openai_api_key";

/// Asynchronous string map with explicit save semantics
///
/// `set` and `delete` may be staged until `flush` is called. Deleting a
/// missing entry is not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Reads an entry; `Ok(None)` when absent
    async fn get(&self, name: &str) -> Result<Option<String>>;

    /// Writes or overwrites an entry
    async fn set(&self, name: &str, value: &str) -> Result<()>;

    /// Removes an entry if present
    async fn delete(&self, name: &str) -> Result<()>;

    /// Commits staged changes to durable storage
    async fn flush(&self) -> Result<()>;
}

/// Builds the key store selected by configuration
///
/// # Errors
///
/// Returns error if the file backend has no resolvable path
///
/// # Examples
///
/// ```
/// use relaychat::config::{StorageBackend, StorageConfig};
/// use relaychat::storage::create_key_store;
///
/// let config = StorageConfig {
///     backend: StorageBackend::Memory,
///     ..Default::default()
/// };
/// assert!(create_key_store(&config).is_ok());
/// ```
pub fn create_key_store(config: &StorageConfig) -> Result<Arc<dyn KeyStore>> {
    match config.backend {
        StorageBackend::Keyring => {
            tracing::debug!(service = %config.service, "Using keyring key store");
            Ok(Arc::new(KeyringStore::new(config.service.clone())))
        }
        StorageBackend::File => {
            let path = config.resolved_path().ok_or_else(|| {
                RelayError::Config("No path available for file key store".to_string())
            })?;
            tracing::debug!(path = %path.display(), "Using file key store");
            Ok(Arc::new(FileKeyStore::new(path)))
        }
        StorageBackend::Memory => {
            tracing::debug!("Using in-memory key store");
            Ok(Arc::new(MemoryKeyStore::new()))
        }
    }
}

/// Process-local key store
///
/// Writes are visible immediately; `flush` is a no-op.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry
    pub fn with_entry(name: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(name.into(), value.into());
        }
        store
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| {
            RelayError::StorageUnavailable("memory key store lock poisoned".to_string()).into()
        })
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<()> {
        self.lock()?.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.lock()?.remove(name);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_set_get_delete() {
        let store = MemoryKeyStore::new();
        assert_eq!(store.get(API_KEY_NAME).await.unwrap(), None);

        store.set(API_KEY_NAME, "sk-1").await.unwrap();
        assert_eq!(
            store.get(API_KEY_NAME).await.unwrap().as_deref(),
            Some("sk-1")
        );

        store.set(API_KEY_NAME, "sk-2").await.unwrap();
        assert_eq!(
            store.get(API_KEY_NAME).await.unwrap().as_deref(),
            Some("sk-2")
        );

        store.delete(API_KEY_NAME).await.unwrap();
        assert_eq!(store.get(API_KEY_NAME).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_delete_missing_is_ok() {
        let store = MemoryKeyStore::new();
        assert!(store.delete(API_KEY_NAME).await.is_ok());
        assert!(store.flush().await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_store_with_entry() {
        let store = MemoryKeyStore::with_entry(API_KEY_NAME, "sk-seeded");
        assert_eq!(
            store.get(API_KEY_NAME).await.unwrap().as_deref(),
            Some("sk-seeded")
        );
    }

    #[test]
    fn test_create_key_store_file_backend_with_path() {
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: Some(std::env::temp_dir().join("relaychat-test-store.json")),
            ..Default::default()
        };
        assert!(create_key_store(&config).is_ok());
    }
}
