//! Mirroring remote profiles into local accounts.

use chrono::{DateTime, Utc};
use po_identity_core::{
    AcceptAll, IdentityError, IdentityResult, LocalUserIdentity, NotificationPreference,
    RemoteProfile, UserInitHook, UserName, UserStore,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Inputs of a single provisioning event besides the profile itself
#[derive(Debug, Clone)]
pub struct ProvisioningContext {
    pub now: DateTime<Utc>,
    /// Replacement security token
    pub token: String,
    pub notify: bool,
}

impl ProvisioningContext {
    pub fn new(notify: bool) -> Self {
        Self {
            now: Utc::now(),
            token: Uuid::new_v4().simple().to_string(),
            notify,
        }
    }
}

/// Copy a remote profile into an identity.
///
/// Real name and e-mail are taken from the profile as-is, the e-mail is marked
/// as confirmed at `ctx.now` when present, the security token is replaced and,
/// with `ctx.notify`, every [`NotificationPreference`] is switched on.
pub fn apply_profile(
    identity: LocalUserIdentity,
    profile: &RemoteProfile,
    ctx: &ProvisioningContext,
) -> LocalUserIdentity {
    let mut identity = identity;

    identity.real_name = profile.name.clone();
    identity.email = profile.email.clone();
    identity.email_authenticated = identity.email.as_ref().map(|_| ctx.now);
    identity.token = Some(ctx.token.clone());

    if ctx.notify {
        identity.notifications.extend(NotificationPreference::ALL);
    }

    identity.updated_at = ctx.now;
    identity
}

/// Resolves or creates the local account for a verified remote profile.
#[derive(Clone)]
pub struct Provisioner {
    users: Arc<dyn UserStore>,
    hook: Arc<dyn UserInitHook>,
    notify: bool,
}

impl Provisioner {
    pub fn new(users: Arc<dyn UserStore>, notify: bool) -> Self {
        Self {
            users,
            hook: Arc::new(AcceptAll),
            notify,
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn UserInitHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Provision the account named by `profile.user_id`.
    ///
    /// Fails with [`IdentityError::InvalidUserName`] when the remote id cannot
    /// be used as a local account name.
    pub async fn provision(&self, profile: &RemoteProfile) -> IdentityResult<LocalUserIdentity> {
        let name = UserName::parse(profile.user_id.clone())?;

        let existing = self.users.find(&name).await?;
        let is_new = existing.is_none();
        let candidate = existing.unwrap_or_else(|| LocalUserIdentity::new(name.clone()));

        let proceed = self.hook.init_user(&candidate, is_new).await;

        // The hook or a concurrent request may have created the account meanwhile
        let identity = match self.users.find(&name).await? {
            Some(stored) => stored,
            None => self.create_or_reuse(candidate).await?,
        };

        let identity = if proceed {
            apply_profile(identity, profile, &ProvisioningContext::new(self.notify))
        } else {
            debug!(user = %name, "Init hook declined profile setup");
            identity
        };

        self.users.save(&identity).await?;
        Ok(identity)
    }

    async fn create_or_reuse(&self, identity: LocalUserIdentity) -> IdentityResult<LocalUserIdentity> {
        let name = identity.name.clone();

        match self.users.create(identity).await {
            Ok(created) => Ok(created),
            Err(IdentityError::AlreadyExists(_)) => {
                debug!(user = %name, "Account created concurrently, reusing it");
                self.users
                    .find(&name)
                    .await?
                    .ok_or(IdentityError::NotFound(name))
            }
            Err(e) => Err(e),
        }
    }
}
