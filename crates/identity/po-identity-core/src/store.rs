//! Durable user storage.

use crate::error::{IdentityError, IdentityResult};
use crate::types::{LocalUserIdentity, UserName};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for local account storage
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by name
    async fn find(&self, name: &UserName) -> IdentityResult<Option<LocalUserIdentity>>;

    /// Create a new account.
    ///
    /// Fails with [`IdentityError::AlreadyExists`] if an account with the same
    /// name was created first, so callers can recover from creation races.
    async fn create(&self, identity: LocalUserIdentity) -> IdentityResult<LocalUserIdentity>;

    /// Persist the settings of an existing account
    async fn save(&self, identity: &LocalUserIdentity) -> IdentityResult<()>;
}

/// In-memory implementation of UserStore
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<UserName, LocalUserIdentity>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find(&self, name: &UserName) -> IdentityResult<Option<LocalUserIdentity>> {
        let users = self.users.read().await;
        Ok(users.get(name).cloned())
    }

    async fn create(&self, identity: LocalUserIdentity) -> IdentityResult<LocalUserIdentity> {
        let mut users = self.users.write().await;

        if users.contains_key(&identity.name) {
            return Err(IdentityError::AlreadyExists(identity.name));
        }

        debug!("Created local account {}", identity.name);
        users.insert(identity.name.clone(), identity.clone());
        Ok(identity)
    }

    async fn save(&self, identity: &LocalUserIdentity) -> IdentityResult<()> {
        let mut users = self.users.write().await;

        let stored = users
            .get_mut(&identity.name)
            .ok_or_else(|| IdentityError::NotFound(identity.name.clone()))?;
        *stored = identity.clone();

        Ok(())
    }
}
