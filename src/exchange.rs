//! Exchange client
//!
//! Sends one user message to the completion endpoint and folds whatever
//! happens into an [`ExchangeOutcome`]. Each exchange is context-free: only
//! the current message is sent, never earlier turns. There are no retries;
//! a failed exchange yields exactly one outcome and the caller decides
//! whether to resend.
//!
//! At most one exchange may be in flight per client. An overlapping call is
//! answered with [`FailureCategory::Busy`] without touching the network.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::providers::{CompletionProvider, CompletionRequest, Message, ProviderError};
use crate::session::SessionState;

/// Reply text used when the endpoint succeeds but returns no content
pub const EMPTY_RESPONSE_TEXT: &str = "No response received";

/// Detail used for unknown failures that carry no message
pub const UNKNOWN_ERROR_DETAIL: &str = "Unknown error occurred";

/// Why an exchange failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// No credential is active; nothing was sent
    NotConfigured,
    /// Another exchange on the same client is still outstanding
    Busy,
    /// The endpoint rejected the credential (HTTP 401)
    InvalidCredential,
    /// The endpoint is throttling requests (HTTP 429)
    RateLimited,
    /// The endpoint rejected the request (HTTP 400)
    InvalidRequest,
    /// Any other HTTP or transport failure
    Unknown,
}

impl FailureCategory {
    /// Classifies a provider failure by HTTP status
    ///
    /// # Examples
    ///
    /// ```
    /// use relaychat::exchange::FailureCategory;
    ///
    /// assert_eq!(FailureCategory::from_status(Some(401)), FailureCategory::InvalidCredential);
    /// assert_eq!(FailureCategory::from_status(Some(503)), FailureCategory::Unknown);
    /// assert_eq!(FailureCategory::from_status(None), FailureCategory::Unknown);
    /// ```
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(401) => Self::InvalidCredential,
            Some(429) => Self::RateLimited,
            Some(400) => Self::InvalidRequest,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotConfigured => "not_configured",
            Self::Busy => "busy",
            Self::InvalidCredential => "invalid_credential",
            Self::RateLimited => "rate_limited",
            Self::InvalidRequest => "invalid_request",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Result of one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The endpoint answered
    Success {
        /// Reply text, or [`EMPTY_RESPONSE_TEXT`] when none was returned
        text: String,
    },
    /// The exchange failed
    Failure {
        /// Classification of the failure
        category: FailureCategory,
        /// Underlying message from the endpoint or transport
        detail: String,
    },
}

impl ExchangeOutcome {
    fn failure(category: FailureCategory, detail: impl Into<String>) -> Self {
        Self::Failure {
            category,
            detail: detail.into(),
        }
    }

    fn from_provider_error(error: ProviderError) -> Self {
        let category = FailureCategory::from_status(error.status);
        let detail = if error.message.trim().is_empty() {
            UNKNOWN_ERROR_DETAIL.to_string()
        } else {
            error.message
        };
        Self::failure(category, detail)
    }

    /// Returns `true` for [`ExchangeOutcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Failure category, if this is a failure
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            Self::Failure { category, .. } => Some(*category),
            Self::Success { .. } => None,
        }
    }

    /// Text shown to the user for this outcome
    ///
    /// # Examples
    ///
    /// ```
    /// use relaychat::exchange::ExchangeOutcome;
    ///
    /// let ok = ExchangeOutcome::Success { text: "Hi!".to_string() };
    /// assert_eq!(ok.user_message(), "Hi!");
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            Self::Success { text } => text.clone(),
            Self::Failure { category, detail } => match category {
                FailureCategory::NotConfigured => {
                    "API key not configured. Please set your OpenAI API key.".to_string()
                }
                FailureCategory::Busy => {
                    "A request is already in progress. Please wait for it to finish.".to_string()
                }
                FailureCategory::InvalidCredential => {
                    "Invalid API key. Please check your OpenAI API key.".to_string()
                }
                FailureCategory::RateLimited => {
                    "Rate limit exceeded. Please try again later.".to_string()
                }
                FailureCategory::InvalidRequest => {
                    "Invalid request. Please check your message.".to_string()
                }
                FailureCategory::Unknown => format!("API Error: {}", detail),
            },
        }
    }
}

/// Fixed request parameters
///
/// Read once from configuration; identical for every exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeSettings {
    /// Model identifier
    pub model: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl From<&ApiConfig> for ExchangeSettings {
    fn from(config: &ApiConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Clears the in-flight flag when the exchange ends, however it ends
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Sends single messages to the completion endpoint
pub struct ExchangeClient {
    provider: Arc<dyn CompletionProvider>,
    settings: ExchangeSettings,
    in_flight: AtomicBool,
}

impl ExchangeClient {
    /// Creates a client with fixed request settings
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: ExchangeSettings) -> Self {
        Self {
            provider,
            settings,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Request settings used for every exchange
    pub fn settings(&self) -> &ExchangeSettings {
        &self.settings
    }

    /// Returns `true` while an exchange is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Sends `message` as the sole user turn
    ///
    /// Requires a logged-in session; otherwise returns
    /// [`FailureCategory::NotConfigured`] without any network I/O.
    pub async fn send(&self, session: &SessionState, message: &str) -> ExchangeOutcome {
        let credential = match session.credential() {
            Some(credential) => credential,
            None => {
                tracing::debug!("Exchange attempted without an active credential");
                return ExchangeOutcome::failure(
                    FailureCategory::NotConfigured,
                    "no active credential",
                );
            }
        };

        let _guard = match InFlightGuard::acquire(&self.in_flight) {
            Some(guard) => guard,
            None => {
                tracing::warn!("Rejected overlapping exchange");
                return ExchangeOutcome::failure(FailureCategory::Busy, "exchange in progress");
            }
        };

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(message)],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        match self.provider.complete(credential, &request).await {
            Ok(response) => {
                let text = response
                    .content
                    .unwrap_or_else(|| EMPTY_RESPONSE_TEXT.to_string());
                tracing::debug!(chars = text.len(), "Exchange succeeded");
                ExchangeOutcome::Success { text }
            }
            Err(e) => {
                let outcome = ExchangeOutcome::from_provider_error(e);
                if let ExchangeOutcome::Failure { category, detail } = &outcome {
                    tracing::error!(%category, "Exchange failed: {}", detail);
                }
                outcome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use crate::providers::{CompletionResponse, MockCompletionProvider};
    use crate::test_utils::SlowProvider;
    use std::time::Duration;

    fn settings() -> ExchangeSettings {
        ExchangeSettings::from(&ApiConfig::default())
    }

    fn logged_in() -> SessionState {
        SessionState::LoggedIn(Credential::new("sk-test"))
    }

    fn client_returning(
        result: std::result::Result<CompletionResponse, ProviderError>,
    ) -> ExchangeClient {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .times(1)
            .return_once(move |_, _| result);
        ExchangeClient::new(Arc::new(provider), settings())
    }

    #[tokio::test]
    async fn test_logged_out_returns_not_configured_without_network() {
        let mut provider = MockCompletionProvider::new();
        provider.expect_complete().times(0);
        provider.expect_list_models().times(0);
        let client = ExchangeClient::new(Arc::new(provider), settings());

        let outcome = client.send(&SessionState::LoggedOut, "hello").await;

        assert_eq!(outcome.category(), Some(FailureCategory::NotConfigured));
    }

    #[tokio::test]
    async fn test_success_returns_first_choice_content() {
        let client = client_returning(Ok(CompletionResponse::with_content("Hi there")));
        let outcome = client.send(&logged_in(), "hello").await;
        assert_eq!(
            outcome,
            ExchangeOutcome::Success {
                text: "Hi there".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_response_is_success_with_placeholder() {
        let client = client_returning(Ok(CompletionResponse::empty()));
        let outcome = client.send(&logged_in(), "hello").await;
        assert_eq!(
            outcome,
            ExchangeOutcome::Success {
                text: EMPTY_RESPONSE_TEXT.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_status_codes_map_to_categories() {
        let cases = [
            (401, FailureCategory::InvalidCredential),
            (429, FailureCategory::RateLimited),
            (400, FailureCategory::InvalidRequest),
            (500, FailureCategory::Unknown),
        ];

        for (status, expected) in cases {
            let client = client_returning(Err(ProviderError::http(status, "boom")));
            let outcome = client.send(&logged_in(), "hello").await;
            assert_eq!(outcome.category(), Some(expected), "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_transport_failure_carries_message() {
        let client = client_returning(Err(ProviderError::transport("connection refused")));
        let outcome = client.send(&logged_in(), "hello").await;
        assert_eq!(
            outcome,
            ExchangeOutcome::Failure {
                category: FailureCategory::Unknown,
                detail: "connection refused".to_string()
            }
        );
        assert_eq!(outcome.user_message(), "API Error: connection refused");
    }

    #[tokio::test]
    async fn test_unknown_failure_without_message_uses_placeholder() {
        let client = client_returning(Err(ProviderError::transport("")));
        let outcome = client.send(&logged_in(), "hello").await;
        assert_eq!(
            outcome.user_message(),
            format!("API Error: {}", UNKNOWN_ERROR_DETAIL)
        );
    }

    #[tokio::test]
    async fn test_request_carries_only_current_message_and_fixed_settings() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .withf(|credential, request| {
                credential.expose() == "sk-test"
                    && request.messages == vec![Message::user("second message")]
                    && request.model == "gpt-3.5-turbo"
                    && request.max_tokens == 1000
                    && (request.temperature - 0.7).abs() < f32::EPSILON
            })
            .times(2)
            .returning(|_, _| Ok(CompletionResponse::with_content("ok")));
        let client = ExchangeClient::new(Arc::new(provider), settings());

        client.send(&logged_in(), "second message").await;
        client.send(&logged_in(), "second message").await;
    }

    #[tokio::test]
    async fn test_overlapping_send_is_busy() {
        let provider = SlowProvider {
            delay: Duration::from_millis(50),
            reply: "done".to_string(),
        };
        let client = ExchangeClient::new(Arc::new(provider), settings());
        let session = logged_in();

        let (first, second) = tokio::join!(
            client.send(&session, "first"),
            client.send(&session, "second")
        );

        assert!(first.is_success());
        assert_eq!(second.category(), Some(FailureCategory::Busy));
        assert!(!client.is_busy());
    }

    #[tokio::test]
    async fn test_guard_released_after_failure() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .times(2)
            .returning(|_, _| Err(ProviderError::http(500, "server error")));
        let client = ExchangeClient::new(Arc::new(provider), settings());

        client.send(&logged_in(), "a").await;
        let outcome = client.send(&logged_in(), "b").await;

        assert_eq!(outcome.category(), Some(FailureCategory::Unknown));
    }

    #[test]
    fn test_user_messages_for_categories() {
        let msg = |category| {
            ExchangeOutcome::Failure {
                category,
                detail: "x".to_string(),
            }
            .user_message()
        };
        assert_eq!(
            msg(FailureCategory::InvalidCredential),
            "Invalid API key. Please check your OpenAI API key."
        );
        assert_eq!(
            msg(FailureCategory::RateLimited),
            "Rate limit exceeded. Please try again later."
        );
        assert_eq!(
            msg(FailureCategory::InvalidRequest),
            "Invalid request. Please check your message."
        );
        assert_eq!(
            msg(FailureCategory::NotConfigured),
            "API key not configured. Please set your OpenAI API key."
        );
    }
}
