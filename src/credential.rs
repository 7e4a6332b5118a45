//! API key credential type
//!
//! A [`Credential`] wraps the secret string that authorizes requests to the
//! completion endpoint. Its `Debug` and `Display` implementations are
//! redacted so a credential can never leak through `tracing` fields or error
//! messages by accident.

use std::fmt;

/// Literal value shipped in example configuration files
///
/// A configured key equal to this string is treated as "not configured".
pub const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// An opaque API key
///
/// # Examples
///
/// ```
/// use relaychat::credential::Credential;
///
/// let key = Credential::new("sk-test");
/// assert_eq!(key.expose(), "sk-test");
/// assert_eq!(format!("{:?}", key), "Credential(***)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a secret string
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Builds a credential from a configured value
    ///
    /// Returns `None` when the value is blank or equal to
    /// [`PLACEHOLDER_API_KEY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use relaychat::credential::{Credential, PLACEHOLDER_API_KEY};
    ///
    /// assert!(Credential::from_configured("sk-live").is_some());
    /// assert!(Credential::from_configured("   ").is_none());
    /// assert!(Credential::from_configured(PLACEHOLDER_API_KEY).is_none());
    /// ```
    pub fn from_configured(value: &str) -> Option<Self> {
        if value.trim().is_empty() || value == PLACEHOLDER_API_KEY {
            None
        } else {
            Some(Self::new(value))
        }
    }

    /// Returns the secret for use in an authorization header or key store
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
