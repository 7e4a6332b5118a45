//! Session management
//!
//! - `resolver`: picks the startup credential (configured key, then stored key)
//! - `manager`: owns the active credential and the remembered key record

pub mod manager;
pub mod resolver;

pub use manager::{LoginOutcome, SessionManager, SessionState};
pub use resolver::{CredentialResolver, CredentialSource, ResolvedCredential};
