//! Key store backed by a JSON map file
//!
//! The file is loaded lazily on first access. `set` and `delete` only touch
//! the in-memory copy; [`KeyStore::flush`] writes the whole map back through
//! a temporary file and an atomic rename. A missing file reads as an empty
//! map.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::KeyStore;
use crate::error::{Result, RelayError};

type Entries = BTreeMap<String, String>;

/// JSON file key store
///
/// # Examples
///
/// ```no_run
/// use relaychat::storage::{FileKeyStore, KeyStore, API_KEY_NAME};
///
/// # async fn example() -> relaychat::error::Result<()> {
/// let store = FileKeyStore::new("/tmp/relaychat/store.json");
/// store.set(API_KEY_NAME, "sk-example").await?;
/// store.flush().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileKeyStore {
    path: PathBuf,
    entries: Mutex<Option<Entries>>,
}

impl FileKeyStore {
    /// Creates a store over the given file; nothing is read until first use
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(path: &Path) -> Result<Entries> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Entries::new()),
            Ok(contents) => {
                let entries: Entries = serde_json::from_str(&contents).map_err(|e| {
                    RelayError::StorageUnavailable(format!(
                        "Failed to parse key store {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                tracing::debug!(path = %path.display(), entries = entries.len(), "Loaded key store");
                Ok(entries)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(RelayError::StorageUnavailable(format!(
                "Failed to read key store {}: {}",
                path.display(),
                e
            ))
            .into()),
        }
    }

    async fn write(path: &Path, entries: &Entries) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::create_private_dir(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = path.with_extension("json.tmp");

        // A leftover temp file would keep whatever mode it was created with.
        match tokio::fs::remove_file(&tmp_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&tmp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp_path, path).await?;
        Ok(())
    }

    async fn create_private_dir(dir: &Path) -> Result<()> {
        let mut builder = tokio::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o700);
        builder.create(dir).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyStore for FileKeyStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(Self::load(&self.path).await?);
        }
        Ok(guard.as_ref().and_then(|entries| entries.get(name).cloned()))
    }

    async fn set(&self, name: &str, value: &str) -> Result<()> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(Self::load(&self.path).await?);
        }
        if let Some(entries) = guard.as_mut() {
            entries.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(Self::load(&self.path).await?);
        }
        if let Some(entries) = guard.as_mut() {
            entries.remove(name);
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let guard = self.entries.lock().await;
        match guard.as_ref() {
            Some(entries) => {
                Self::write(&self.path, entries).await.map_err(|e| {
                    RelayError::StorageUnavailable(format!(
                        "Failed to write key store {}: {}",
                        self.path.display(),
                        e
                    ))
                })?;
                tracing::debug!(path = %self.path.display(), "Flushed key store");
                Ok(())
            }
            // Nothing was loaded, so nothing changed.
            None => Ok(()),
        }
    }
}
