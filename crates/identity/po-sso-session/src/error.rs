//! Session provider error types.

use po_identity_core::IdentityError;
use po_sso_client::SsoError;
use thiserror::Error;

/// Invalid provider configuration, reported at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("priority must be specified")]
    MissingPriority,

    #[error("Invalid priority {value}: must be between {min} and {max}")]
    InvalidPriority { value: i64, min: u8, max: u8 },

    #[error("Invalid cookie name: {0:?}")]
    InvalidCookieName(String),

    #[error("Invalid SSO client configuration: {0}")]
    SsoClient(#[from] SsoError),
}

#[derive(Debug, Error)]
pub enum SessionManagerError {
    #[error("Invalid session TTL {0}s")]
    InvalidTtl(u64),

    #[error("Session storage error: {0}")]
    Storage(String),
}

/// Errors that abort session resolution for a request.
///
/// SSO transport failures never appear here; they resolve to an anonymous
/// request instead.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Session manager error: {0}")]
    SessionManager(#[from] SessionManagerError),
}
