//! SSO client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

/// Path of the verification script on the Product Opener server
pub const VERIFICATION_PATH: &str = "/cgi/sso.pl";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SsoClientConfig {
    /// Host (optionally with port) serving the verification endpoint
    pub domain: String,
    /// URL scheme, `https` unless testing against a local server
    pub scheme: String,
    pub http_timeout_seconds: u64,
}

impl Default for SsoClientConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            scheme: "https".to_string(),
            http_timeout_seconds: 30,
        }
    }
}

impl SsoClientConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }

    /// The fixed verification URL derived from scheme and domain
    pub fn verification_url(&self) -> Result<Url, url::ParseError> {
        if self.domain.trim().is_empty() {
            return Err(url::ParseError::EmptyHost);
        }

        Url::parse(&format!(
            "{}://{}{}",
            self.scheme, self.domain, VERIFICATION_PATH
        ))
    }
}
