//! Provider module for RelayChat
//!
//! This module contains the completion endpoint abstraction and the
//! OpenAI-compatible implementation.

pub mod base;
pub mod openai;

pub use base::{
    CompletionProvider, CompletionRequest, CompletionResponse, Message, ModelInfo, ProviderError,
    TokenUsage,
};
pub use openai::OpenAiProvider;

#[cfg(test)]
pub use base::MockCompletionProvider;

use crate::config::ApiConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create the provider used by the session manager and exchange client
///
/// # Errors
///
/// Returns error if the HTTP client cannot be initialized
pub fn create_provider(config: &ApiConfig) -> Result<Arc<dyn CompletionProvider>> {
    Ok(Arc::new(OpenAiProvider::new(config)?))
}
