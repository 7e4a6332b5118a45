//! Session manager
//!
//! Owns the single active credential and is the only writer of the
//! remembered API key record. The state machine has two states,
//! [`SessionState::LoggedOut`] and [`SessionState::LoggedIn`]; the only ways
//! into `LoggedIn` are a successful probe ([`SessionManager::validate_and_login`])
//! or a trusted source ([`SessionManager::set_from_trusted_source`]).

use std::sync::Arc;

use crate::credential::Credential;
use crate::providers::CompletionProvider;
use crate::session::resolver::ResolvedCredential;
use crate::storage::{KeyStore, API_KEY_NAME};

/// In-memory authentication state
///
/// Holding the credential inside the `LoggedIn` variant keeps "active" and
/// "has a credential" from ever disagreeing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No credential is active
    #[default]
    LoggedOut,
    /// The contained credential authorizes requests
    LoggedIn(Credential),
}

impl SessionState {
    /// Returns `true` when a credential is active
    pub fn is_active(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }

    /// Returns the active credential, if any
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::LoggedIn(credential) => Some(credential),
            Self::LoggedOut => None,
        }
    }
}

/// Result of an interactive login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The probe failed; the session is unchanged
    Rejected,
    /// The probe succeeded and the session now holds the key
    Authenticated {
        /// Whether the key was written to the key store
        ///
        /// `false` when `remember` was off or the write failed.
        persisted: bool,
    },
}

impl LoginOutcome {
    /// Returns `true` when the login succeeded
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Holds the active credential and synchronizes it with the key store
pub struct SessionManager {
    store: Arc<dyn KeyStore>,
    provider: Arc<dyn CompletionProvider>,
    state: SessionState,
}

impl SessionManager {
    /// Creates a logged-out session
    pub fn new(store: Arc<dyn KeyStore>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            store,
            provider,
            state: SessionState::LoggedOut,
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns `true` when a credential is active
    pub fn is_authenticated(&self) -> bool {
        self.state.is_active()
    }

    /// Probes a candidate key and logs in on success
    ///
    /// The candidate is checked with a read-only model listing. On success
    /// the session switches to the candidate and, when `remember` is set,
    /// the key is written to the store and flushed. A failed write is logged
    /// and reported through `LoginOutcome::Authenticated { persisted }` but
    /// does not undo the login. On probe failure nothing changes.
    ///
    /// Blank keys are not rejected here; callers validate input.
    pub async fn validate_and_login(&mut self, key: &str, remember: bool) -> LoginOutcome {
        let candidate = Credential::new(key);

        if let Err(e) = self.provider.list_models(&candidate).await {
            tracing::warn!(status = ?e.status, "API key validation failed: {}", e);
            return LoginOutcome::Rejected;
        }

        tracing::info!("API key validated");
        let persisted = if remember {
            self.persist(&candidate).await
        } else {
            false
        };
        self.state = SessionState::LoggedIn(candidate);

        LoginOutcome::Authenticated { persisted }
    }

    /// Activates a key whose provenance is already trusted, without probing
    ///
    /// `persist` must be `false` for configured and already-stored keys.
    /// Returns whether the key was written to the store.
    pub async fn set_from_trusted_source(&mut self, credential: Credential, persist: bool) -> bool {
        let persisted = if persist {
            self.persist(&credential).await
        } else {
            false
        };
        self.state = SessionState::LoggedIn(credential);
        tracing::debug!(persisted, "Session activated from trusted source");
        persisted
    }

    /// Activates a startup credential; never writes the store
    pub async fn activate(&mut self, resolved: ResolvedCredential) {
        tracing::info!(source = %resolved.source, "Activating startup credential");
        self.set_from_trusted_source(resolved.credential, false).await;
    }

    /// Ends the session and forgets the remembered key
    ///
    /// Always leaves the session logged out. Key store failures are logged
    /// and swallowed.
    pub async fn logout(&mut self) {
        self.state = SessionState::LoggedOut;

        if let Err(e) = self.store.delete(API_KEY_NAME).await {
            tracing::warn!("Failed to remove stored API key: {}", e);
            return;
        }
        if let Err(e) = self.store.flush().await {
            tracing::warn!("Failed to flush key store after logout: {}", e);
            return;
        }
        tracing::info!("Logged out; stored API key removed");
    }

    async fn persist(&self, credential: &Credential) -> bool {
        if let Err(e) = self.store.set(API_KEY_NAME, credential.expose()).await {
            tracing::warn!("Failed to save API key: {}", e);
            return false;
        }
        if let Err(e) = self.store.flush().await {
            tracing::warn!("Failed to flush key store: {}", e);
            return false;
        }
        tracing::debug!("API key saved to key store");
        true
    }
}
