//! Product Opener SSO client.
//!
//! Decodes the ampersand-delimited SSO cookie into an [`SsoCookiePayload`] and
//! verifies it against the `/cgi/sso.pl` endpoint, yielding a
//! [`RemoteProfile`](po_identity_core::RemoteProfile). Every failure is
//! reported as an [`SsoError`]; callers decide how to degrade.

mod client;
mod config;
mod cookie;
mod error;


pub use client::{SsoClient, SsoVerifier};
pub use config::{SsoClientConfig, VERIFICATION_PATH};
pub use cookie::{DELETED_SENTINEL, SsoCookiePayload, USER_ID_FIELD};
pub use error::{SsoError, SsoResult};

pub use po_identity_core::RemoteProfile;
