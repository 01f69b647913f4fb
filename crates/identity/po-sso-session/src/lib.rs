//! Session provider bridging Product Opener SSO into local sessions.
//!
//! [`SsoSessionProvider`] resolves a session for each inbound request: an
//! existing local session is resumed from its cookie, otherwise the SSO cookie
//! is verified with the identity service, the matching local account is
//! provisioned and a new session is persisted. Recoverable SSO failures leave
//! the request anonymous; only identity and session-storage problems surface
//! as [`ResolveError`].

mod config;
mod cookie;
mod error;
mod provider;
mod provisioning;
mod request;
mod session;


pub use config::{
    DEFAULT_SESSION_COOKIE_NAME, DEFAULT_SSO_COOKIE_NAME, Priority, ProviderConfig, SameSitePolicy,
    SessionCookieOptions,
};
pub use error::{ConfigError, ResolveError, SessionManagerError};
pub use provider::{PROVIDER_ID, SsoSessionProvider};
pub use provisioning::{Provisioner, ProvisioningContext, apply_profile};
pub use request::InboundRequest;
pub use session::{
    InMemorySessionManager, LocalSession, SessionInfo, SessionManager, SessionUser,
    generate_session_id, is_valid_session_id,
};

// Re-export common types for convenience
pub use axum_extra::extract::cookie::Cookie;
pub use po_identity_core::{
    AcceptAll, InMemoryUserStore, LocalUserIdentity, RemoteProfile, UserInitHook, UserName,
    UserStore,
};
pub use po_sso_client::{SsoClient, SsoClientConfig, SsoCookiePayload, SsoVerifier};
