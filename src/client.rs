//! Chat client composition root
//!
//! [`ChatClient`] wires the credential resolver, session manager, exchange
//! client and transcript together and is the surface the terminal UI talks
//! to. There is no global state: each `ChatClient` owns its session, and
//! its key store and provider are injected.

use std::sync::Arc;

use crate::config::Config;
use crate::conversation::{ChatMessage, Conversation};
use crate::error::Result;
use crate::exchange::{ExchangeClient, ExchangeOutcome, ExchangeSettings};
use crate::providers::{create_provider, CompletionProvider};
use crate::session::{
    CredentialResolver, CredentialSource, LoginOutcome, SessionManager, SessionState,
};
use crate::storage::{create_key_store, KeyStore};

/// Session-aware chat client
///
/// # Examples
///
/// ```no_run
/// use relaychat::client::ChatClient;
/// use relaychat::config::Config;
///
/// # async fn example() -> relaychat::error::Result<()> {
/// let mut client = ChatClient::from_config(&Config::default())?;
/// if client.resolve_startup_credential().await.is_none() {
///     client.login("sk-...", true).await;
/// }
/// let outcome = client.send_message("Hello!").await;
/// println!("{}", outcome.user_message());
/// # Ok(())
/// # }
/// ```
pub struct ChatClient {
    resolver: CredentialResolver,
    session: SessionManager,
    exchange: ExchangeClient,
    conversation: Conversation,
}

impl ChatClient {
    /// Assembles a client from explicit collaborators
    pub fn new(
        config: &Config,
        store: Arc<dyn KeyStore>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            resolver: CredentialResolver::new(config.configured_credential(), store.clone()),
            session: SessionManager::new(store, provider.clone()),
            exchange: ExchangeClient::new(provider, ExchangeSettings::from(&config.api)),
            conversation: Conversation::new(),
        }
    }

    /// Builds the key store and provider selected by configuration
    ///
    /// # Errors
    ///
    /// Returns error if the key store or HTTP client cannot be created
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = create_key_store(&config.storage)?;
        let provider = create_provider(&config.api)?;
        Ok(Self::new(config, store, provider))
    }

    /// Activates the startup credential, if one resolves
    ///
    /// Returns where the credential came from, or `None` when the user has
    /// to log in interactively.
    pub async fn resolve_startup_credential(&mut self) -> Option<CredentialSource> {
        let resolved = self.resolver.resolve().await?;
        let source = resolved.source;
        self.session.activate(resolved).await;
        Some(source)
    }

    /// Validates a key and logs in; see [`SessionManager::validate_and_login`]
    pub async fn login(&mut self, key: &str, remember: bool) -> bool {
        self.login_with_outcome(key, remember)
            .await
            .is_authenticated()
    }

    /// Like [`ChatClient::login`] but reports whether the key was saved
    pub async fn login_with_outcome(&mut self, key: &str, remember: bool) -> LoginOutcome {
        self.session.validate_and_login(key, remember).await
    }

    /// Logs out, forgets the stored key and discards the transcript
    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.conversation.clear();
    }

    /// Sends one message and records both sides in the transcript
    pub async fn send_message(&mut self, text: &str) -> ExchangeOutcome {
        self.conversation.push_user(text);
        let outcome = self.exchange.send(self.session.state(), text).await;
        self.conversation.push_outcome(&outcome);
        outcome
    }

    /// Returns `true` when a credential is active
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Current session state
    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    /// Transcript in insertion order
    pub fn messages(&self) -> &[ChatMessage] {
        self.conversation.messages()
    }

    /// Fixed request settings
    pub fn exchange_settings(&self) -> &ExchangeSettings {
        self.exchange.settings()
    }
}
