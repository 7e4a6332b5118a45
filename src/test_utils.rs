//! Test utilities for RelayChat
//!
//! Shared test doubles for the key store and the completion provider.

use crate::credential::Credential;
use crate::error::{Result, RelayError};
use crate::providers::{
    CompletionProvider, CompletionRequest, CompletionResponse, ModelInfo, ProviderError,
};
use crate::storage::KeyStore;
use async_trait::async_trait;
use std::time::Duration;

/// Key store whose every operation fails
///
/// Stands in for an unavailable keyring or unwritable store file.
pub struct FailingKeyStore;

#[async_trait]
impl KeyStore for FailingKeyStore {
    async fn get(&self, _name: &str) -> Result<Option<String>> {
        Err(RelayError::StorageUnavailable("store offline".to_string()).into())
    }

    async fn set(&self, _name: &str, _value: &str) -> Result<()> {
        Err(RelayError::StorageUnavailable("store offline".to_string()).into())
    }

    async fn delete(&self, _name: &str) -> Result<()> {
        Err(RelayError::StorageUnavailable("store offline".to_string()).into())
    }

    async fn flush(&self) -> Result<()> {
        Err(RelayError::StorageUnavailable("store offline".to_string()).into())
    }
}

/// Provider that answers every completion after a fixed delay
///
/// Used to hold an exchange open while a second one is attempted.
pub struct SlowProvider {
    /// Delay before each completion resolves
    pub delay: Duration,
    /// Content returned by each completion
    pub reply: String,
}

#[async_trait]
impl CompletionProvider for SlowProvider {
    async fn list_models(
        &self,
        _credential: &Credential,
    ) -> std::result::Result<Vec<ModelInfo>, ProviderError> {
        Ok(Vec::new())
    }

    async fn complete(
        &self,
        _credential: &Credential,
        _request: &CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(CompletionResponse::with_content(self.reply.clone()))
    }
}
