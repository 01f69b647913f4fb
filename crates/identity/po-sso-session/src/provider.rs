//! Session provider resolving requests through Product Opener SSO.

use crate::config::{Priority, ProviderConfig};
use crate::cookie;
use crate::error::{ConfigError, ResolveError};
use crate::provisioning::Provisioner;
use crate::request::InboundRequest;
use crate::session::{
    SessionInfo, SessionManager, SessionUser, generate_session_id, is_valid_session_id,
};
use axum_extra::extract::cookie::Cookie;
use po_identity_core::{UserInitHook, UserStore};
use po_sso_client::{SsoClient, SsoCookiePayload, SsoVerifier};
use std::sync::Arc;
use tracing::{debug, info};

pub const PROVIDER_ID: &str = "po-sso";

/// Resolves, per request, an existing session or one established via SSO.
///
/// Each call to [`provide_session_info`](Self::provide_session_info) makes at
/// most one SSO round-trip. Resumed sessions are described as persisted; new
/// ones are persisted through the [`SessionManager`] and described as they
/// were before that call.
#[derive(Clone)]
pub struct SsoSessionProvider {
    config: ProviderConfig,
    priority: Priority,
    verifier: Arc<dyn SsoVerifier>,
    sessions: Arc<dyn SessionManager>,
    provisioner: Provisioner,
}

impl SsoSessionProvider {
    pub fn new(
        config: ProviderConfig,
        verifier: Arc<dyn SsoVerifier>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionManager>,
    ) -> Result<Self, ConfigError> {
        let priority = config.validate()?;
        let provisioner = Provisioner::new(users, config.notify);

        Ok(Self {
            config,
            priority,
            verifier,
            sessions,
            provisioner,
        })
    }

    /// Create a provider talking to the configured SSO endpoint over HTTP
    pub fn from_config(
        config: ProviderConfig,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionManager>,
    ) -> Result<Self, ConfigError> {
        let client = SsoClient::new(&config.sso)?;
        Self::new(config, Arc::new(client), users, sessions)
    }

    pub fn with_init_hook(mut self, hook: Arc<dyn UserInitHook>) -> Self {
        self.provisioner = self.provisioner.with_hook(hook);
        self
    }

    pub fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Full name of the session cookie, prefix included
    pub fn session_cookie_name(&self) -> String {
        format!(
            "{}{}",
            self.config.session_cookie_options.prefix, self.config.session_cookie_name
        )
    }

    /// Session id carried by the request, if it is well formed
    pub fn session_id_from_request(&self, request: &InboundRequest) -> Option<String> {
        request
            .cookie(&self.session_cookie_name())
            .filter(|id| is_valid_session_id(id))
            .map(str::to_string)
    }

    /// Cookie to send with the response once a session is persisted
    pub fn session_cookie(&self, session_id: &str) -> Cookie<'static> {
        cookie::session_cookie(
            &self.session_cookie_name(),
            session_id,
            &self.config.session_cookie_options,
        )
    }

    pub fn clear_session_cookie(&self) -> Cookie<'static> {
        cookie::clear_session_cookie(
            &self.session_cookie_name(),
            &self.config.session_cookie_options,
        )
    }

    /// Resolve the session for an inbound request.
    ///
    /// Returns `Ok(None)` when the request stays anonymous. Errors are limited
    /// to identity and session storage problems.
    pub async fn provide_session_info(
        &self,
        request: &InboundRequest,
    ) -> Result<Option<SessionInfo>, ResolveError> {
        if let Some(id) = self.session_id_from_request(request) {
            if self.sessions.get_session(&id).await?.is_some() {
                debug!("Resuming existing session");
                return Ok(Some(SessionInfo {
                    provider: PROVIDER_ID.to_string(),
                    id,
                    priority: self.priority,
                    persisted: true,
                    user: None,
                }));
            }

            debug!("Session cookie does not refer to a live session");
        }

        self.new_session_for_request(request).await
    }

    /// Sessions are only ever started for a concrete request.
    pub fn new_session_info(&self, _id: Option<&str>) -> Option<SessionInfo> {
        None
    }

    async fn new_session_for_request(
        &self,
        request: &InboundRequest,
    ) -> Result<Option<SessionInfo>, ResolveError> {
        let raw = request.cookie(&self.config.sso_cookie_name);
        let Some(payload) = SsoCookiePayload::extract(raw) else {
            info!("No SSO cookie found for request");
            return Ok(None);
        };

        // The verifier reports its own failures
        let Ok(profile) = self.verifier.verify(&payload).await else {
            return Ok(None);
        };

        let identity = self.provisioner.provision(&profile).await?;

        let info = SessionInfo {
            provider: PROVIDER_ID.to_string(),
            id: generate_session_id(),
            priority: Priority::MAX,
            persisted: false,
            user: Some(SessionUser {
                name: identity.name.clone(),
            }),
        };

        self.sessions.persist_session(&info).await?;
        info!(user = %identity.name, "Established session from SSO cookie");

        Ok(Some(info))
    }
}
