//! OpenAI-compatible provider implementation for RelayChat
//!
//! Talks to `GET {base}/models` (credential probe) and
//! `POST {base}/chat/completions` using bearer authentication. Non-success
//! responses are turned into [`ProviderError`] values carrying the HTTP
//! status and the `error.message` from the body when one is present.

use crate::config::ApiConfig;
use crate::credential::Credential;
use crate::error::{Result, RelayError};
use crate::providers::{
    CompletionProvider, CompletionRequest, CompletionResponse, ModelInfo, ProviderError,
    TokenUsage,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// OpenAI chat completions provider
///
/// # Examples
///
/// ```no_run
/// use relaychat::config::ApiConfig;
/// use relaychat::credential::Credential;
/// use relaychat::providers::{CompletionProvider, CompletionRequest, Message, OpenAiProvider};
///
/// # async fn example() -> relaychat::error::Result<()> {
/// let provider = OpenAiProvider::new(&ApiConfig::default())?;
/// let request = CompletionRequest {
///     model: "gpt-3.5-turbo".to_string(),
///     messages: vec![Message::user("Hello!")],
///     max_tokens: 1000,
///     temperature: 0.7,
/// };
/// let response = provider.complete(&Credential::new("sk-..."), &request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
}

/// Response from `GET /models`
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

/// Response from `POST /chat/completions`
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error envelope returned by OpenAI-compatible APIs
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiProvider {
    /// Create a new provider for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use relaychat::config::ApiConfig;
    /// use relaychat::providers::OpenAiProvider;
    ///
    /// let provider = OpenAiProvider::new(&ApiConfig::default()).unwrap();
    /// assert_eq!(provider.base_url(), "https://api.openai.com/v1");
    /// ```
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("relaychat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!("Initialized OpenAI provider: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("OpenAI returned error {}: {}", status, body);
        ProviderError::http(status.as_u16(), extract_error_message(status, &body))
    }
}

/// Picks the most useful message out of an error response body
fn extract_error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("Request failed with status {}", status)
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn list_models(
        &self,
        credential: &Credential,
    ) -> std::result::Result<Vec<ModelInfo>, ProviderError> {
        let url = format!("{}/models", self.base_url);
        tracing::debug!("Probing credential against {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Model listing request failed: {}", e);
                ProviderError::transport(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let models: ModelsResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse models response: {}", e);
            ProviderError::transport(format!("Failed to parse models response: {}", e))
        })?;

        tracing::debug!("Credential accepted; {} models visible", models.data.len());
        Ok(models.data)
    }

    async fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(
            "Sending completion request: model={}, {} messages",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Completion request failed: {}", e);
                ProviderError::transport(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completion response: {}", e);
            ProviderError::transport(format!("Failed to parse completion response: {}", e))
        })?;

        if let Some(usage) = &body.usage {
            tracing::debug!(
                "Completion usage: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty());

        Ok(CompletionResponse {
            content,
            model: body.model,
            usage: body.usage,
        })
    }
}
