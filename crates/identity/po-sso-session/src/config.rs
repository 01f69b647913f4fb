//! Session provider configuration.

use crate::error::ConfigError;
use po_sso_client::SsoClientConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "_AuthProductOpenerSession";

/// Cookie set by Product Opener once a user has logged in there
pub const DEFAULT_SSO_COOKIE_NAME: &str = "session";

/// Rank used by the host to arbitrate between competing session providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(1);
    pub const MAX: Priority = Priority(100);

    pub fn new(value: i64) -> Result<Self, ConfigError> {
        if value < i64::from(Self::MIN.0) || value > i64::from(Self::MAX.0) {
            return Err(ConfigError::InvalidPriority {
                value,
                min: Self::MIN.0,
                max: Self::MAX.0,
            });
        }

        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

/// Transport options for the local session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionCookieOptions {
    /// Prepended to the cookie name
    pub prefix: String,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSitePolicy,
    /// Lifetime in seconds; `None` keeps the cookie for the browser session
    pub max_age_seconds: Option<i64>,
}

impl Default for SessionCookieOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            path: "/".to_string(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: SameSitePolicy::Lax,
            max_age_seconds: None,
        }
    }
}

/// SSO session provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Required; must lie within `Priority::MIN..=Priority::MAX`
    pub priority: Option<i64>,
    pub session_cookie_name: String,
    pub session_cookie_options: SessionCookieOptions,
    /// Name of the cookie carrying the SSO payload
    pub sso_cookie_name: String,
    /// Verification endpoint settings
    pub sso: SsoClientConfig,
    /// Turn on e-mail notifications for provisioned users
    pub notify: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            priority: None,
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            session_cookie_options: SessionCookieOptions::default(),
            sso_cookie_name: DEFAULT_SSO_COOKIE_NAME.to_string(),
            sso: SsoClientConfig::default(),
            notify: false,
        }
    }
}

impl ProviderConfig {
    pub fn new(priority: i64, domain: impl Into<String>) -> Self {
        Self {
            priority: Some(priority),
            sso: SsoClientConfig::new(domain),
            ..Self::default()
        }
    }

    pub fn with_notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.session_cookie_name = name.into();
        self
    }

    pub fn with_session_cookie_options(mut self, options: SessionCookieOptions) -> Self {
        self.session_cookie_options = options;
        self
    }

    pub fn with_sso_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.sso_cookie_name = name.into();
        self
    }

    pub fn with_sso(mut self, sso: SsoClientConfig) -> Self {
        self.sso = sso;
        self
    }

    /// Check the settings the provider depends on and return the priority
    pub fn validate(&self) -> Result<Priority, ConfigError> {
        let priority = Priority::new(self.priority.ok_or(ConfigError::MissingPriority)?)?;

        for name in [&self.session_cookie_name, &self.sso_cookie_name] {
            if !is_valid_cookie_name(name) {
                return Err(ConfigError::InvalidCookieName(name.clone()));
            }
        }

        Ok(priority)
    }
}

fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?={}".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_bounds() {
        assert_eq!(Priority::new(1).unwrap(), Priority::MIN);
        assert_eq!(Priority::new(100).unwrap(), Priority::MAX);
        assert_eq!(Priority::new(40).unwrap().value(), 40);

        for value in [0, -5, 101, 1000] {
            assert!(matches!(
                Priority::new(value),
                Err(ConfigError::InvalidPriority { value: v, min: 1, max: 100 }) if v == value
            ));
        }
    }

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.session_cookie_name, "_AuthProductOpenerSession");
        assert_eq!(config.sso_cookie_name, "session");
        assert!(!config.notify);
        assert!(config.session_cookie_options.http_only);
        assert_eq!(config.session_cookie_options.path, "/");
    }

    #[test]
    fn test_validate_requires_priority() {
        let config = ProviderConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingPriority)));

        let config = ProviderConfig::new(50, "example.org");
        assert_eq!(config.validate().unwrap().value(), 50);
    }

    #[test]
    fn test_validate_rejects_bad_cookie_names() {
        for name in ["", "has space", "semi;colon", "eq=ual"] {
            let config = ProviderConfig::new(50, "example.org").with_sso_cookie_name(name);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidCookieName(n)) if n == name
            ));
        }
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ProviderConfig = serde_json::from_value(serde_json::json!({
            "priority": 30,
            "notify": true,
            "sso": { "domain": "world.openfoodfacts.org" },
            "session_cookie_options": { "same_site": "strict", "secure": false }
        }))
        .unwrap();

        assert_eq!(config.priority, Some(30));
        assert!(config.notify);
        assert_eq!(config.sso.domain, "world.openfoodfacts.org");
        assert_eq!(config.sso.scheme, "https");
        assert_eq!(config.session_cookie_options.same_site, SameSitePolicy::Strict);
        assert!(!config.session_cookie_options.secure);
        assert_eq!(config.session_cookie_name, DEFAULT_SESSION_COOKIE_NAME);
    }
}
