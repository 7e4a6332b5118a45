//! Startup credential resolution
//!
//! Picks the key a session starts with, first match wins:
//!
//! 1. the configured key (environment or config file), used transiently
//! 2. the key remembered in the [`KeyStore`]
//!
//! Resolution never touches the network and reads the store at most once.

use std::fmt;
use std::sync::Arc;

use crate::credential::Credential;
use crate::storage::{KeyStore, API_KEY_NAME};

/// Where a resolved credential came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Environment variable or config file; never persisted
    Configured,
    /// Previously remembered in the key store
    Stored,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => write!(f, "configuration"),
            Self::Stored => write!(f, "key store"),
        }
    }
}

/// A credential chosen at startup together with its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    /// The key to activate
    pub credential: Credential,
    /// Where it was found
    pub source: CredentialSource,
}

/// Determines the startup credential by precedence
pub struct CredentialResolver {
    configured: Option<Credential>,
    store: Arc<dyn KeyStore>,
}

impl CredentialResolver {
    /// Creates a resolver over an optional configured key and a key store
    pub fn new(configured: Option<Credential>, store: Arc<dyn KeyStore>) -> Self {
        Self { configured, store }
    }

    /// Returns the startup credential, or `None` when the user must log in
    ///
    /// Key store read failures are logged and treated as "nothing stored".
    /// A stored value that is blank counts as absent.
    pub async fn resolve(&self) -> Option<ResolvedCredential> {
        if let Some(credential) = &self.configured {
            tracing::info!("Using API key from configuration");
            return Some(ResolvedCredential {
                credential: credential.clone(),
                source: CredentialSource::Configured,
            });
        }

        match self.store.get(API_KEY_NAME).await {
            Ok(Some(value)) if !value.trim().is_empty() => {
                tracing::info!("Using API key from key store");
                Some(ResolvedCredential {
                    credential: Credential::new(value),
                    source: CredentialSource::Stored,
                })
            }
            Ok(_) => {
                tracing::debug!("No stored API key");
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read stored API key: {}", e);
                None
            }
        }
    }
}
