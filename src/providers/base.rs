//! Base provider trait and common types for RelayChat
//!
//! This module defines the [`CompletionProvider`] trait that the session
//! manager and exchange client talk to, along with the request, response,
//! and error types shared by all provider implementations.

use crate::credential::Credential;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message structure sent to the completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use relaychat::providers::Message;
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A single completion request
///
/// Serializes to the body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversational turns; the exchange client always sends exactly one
    pub messages: Vec<Message>,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// Token usage reported by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: usize,
    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: usize,
    /// Sum of both
    #[serde(default)]
    pub total_tokens: usize,
}

/// Result of a successful completion call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionResponse {
    /// Content of the first returned choice, if any
    pub content: Option<String>,
    /// Model that actually served the request
    pub model: Option<String>,
    /// Token usage, when the endpoint reports it
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Creates a response carrying the given content
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Creates a response with no choices
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Model entry returned by the model listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: String,
    /// Owning organization, when reported
    #[serde(default)]
    pub owned_by: Option<String>,
}

/// Failure of a provider call
///
/// `status` is the HTTP status when the endpoint answered; `None` means the
/// request never produced a response (connection, TLS, timeout, decoding).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// HTTP status code, if the endpoint responded
    pub status: Option<u16>,
    /// Human-readable description from the endpoint or transport
    pub message: String,
}

impl ProviderError {
    /// Error for a non-success HTTP response
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Error raised before any HTTP response was received
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

/// Remote completion endpoint
///
/// Every call carries the credential it is bound to, so a candidate key can
/// be probed without touching the active session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Lists models visible to the credential
    ///
    /// Used as a read-only probe to confirm a key is accepted.
    async fn list_models(
        &self,
        credential: &Credential,
    ) -> std::result::Result<Vec<ModelInfo>, ProviderError>;

    /// Sends one completion request
    async fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;
}
