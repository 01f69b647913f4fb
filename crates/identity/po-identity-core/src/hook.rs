//! Extension point for customizing accounts during provisioning.

use crate::types::LocalUserIdentity;
use async_trait::async_trait;

/// Strategy invoked before a provisioned identity is finalized.
///
/// Returning `false` skips copying the remote profile into the identity; the
/// account is still persisted. Implementations may create the backing account
/// themselves, the provisioner re-reads the store afterwards.
#[async_trait]
pub trait UserInitHook: Send + Sync {
    async fn init_user(&self, identity: &LocalUserIdentity, is_new: bool) -> bool;
}

/// A default hook that always lets provisioning proceed
pub struct AcceptAll;

#[async_trait]
impl UserInitHook for AcceptAll {
    async fn init_user(&self, _identity: &LocalUserIdentity, _is_new: bool) -> bool {
        true
    }
}
