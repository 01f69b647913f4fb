//! SSO verification client.

use crate::config::SsoClientConfig;
use crate::cookie::SsoCookiePayload;
use crate::error::{SsoError, SsoResult};
use async_trait::async_trait;
use po_identity_core::RemoteProfile;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Turns a decoded SSO cookie into a verified profile.
#[async_trait]
pub trait SsoVerifier: Send + Sync {
    /// Verify the payload with the identity service.
    ///
    /// Implementations must report every failure through the result and log
    /// it themselves; callers treat any error as "no usable profile".
    async fn verify(&self, payload: &SsoCookiePayload) -> SsoResult<RemoteProfile>;
}

/// HTTP client for the Product Opener `/cgi/sso.pl` endpoint
#[derive(Clone)]
pub struct SsoClient {
    http_client: Client,
    endpoint: Url,
}

impl SsoClient {
    pub fn new(config: &SsoClientConfig) -> SsoResult<Self> {
        let endpoint = config.verification_url()?;
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_profile(&self, payload: &SsoCookiePayload) -> SsoResult<RemoteProfile> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .form(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SsoError::UnsuccessfulResponse {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(SsoError::EmptyResponse);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SsoVerifier for SsoClient {
    async fn verify(&self, payload: &SsoCookiePayload) -> SsoResult<RemoteProfile> {
        let user_id = payload.user_id().unwrap_or_default();
        debug!(user_id, url = %self.endpoint, "Validating SSO cookie");

        match self.fetch_profile(payload).await {
            Ok(profile) => {
                debug!(user_id, profile_user = %profile.user_id, "SSO cookie verified");
                Ok(profile)
            }
            Err(e) => {
                info!(user_id, error = %e, "Could not retrieve user information for SSO cookie");
                Err(e)
            }
        }
    }
}
