//! Local identity types and storage traits for the Product Opener SSO bridge.
//!
//! A [`RemoteProfile`] returned by the SSO service is mirrored into a durable
//! [`LocalUserIdentity`] keyed by a validated [`UserName`]. Storage and the
//! new-user customization hook are consumed through the [`UserStore`] and
//! [`UserInitHook`] traits so hosts can plug in their own backends.

mod error;
mod hook;
mod store;
mod types;

pub use error::{IdentityError, IdentityResult};
pub use hook::{AcceptAll, UserInitHook};
pub use store::{InMemoryUserStore, UserStore};
pub use types::{LocalUserIdentity, NotificationPreference, RemoteProfile, UserName};
