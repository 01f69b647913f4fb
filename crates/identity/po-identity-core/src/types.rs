//! Identity data types.

use crate::error::{IdentityError, IdentityResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::net::IpAddr;

/// Characters that can never appear in a local account name.
const INVALID_NAME_CHARS: &[char] = &['#', '<', '>', '[', ']', '|', '{', '}', '/'];

/// Maximum length of an account name, in bytes.
const MAX_NAME_BYTES: usize = 255;

/// A validated local account name.
///
/// Names are usable as-is: they are never rewritten, only accepted or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate a remote user identifier as a local account name.
    pub fn parse(name: impl Into<String>) -> IdentityResult<Self> {
        let name = name.into();

        let valid = !name.is_empty()
            && name.trim() == name
            && name.len() <= MAX_NAME_BYTES
            && !name
                .chars()
                .any(|c| c.is_control() || INVALID_NAME_CHARS.contains(&c))
            && name.parse::<IpAddr>().is_err();

        if valid {
            Ok(Self(name))
        } else {
            Err(IdentityError::InvalidUserName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile returned by the SSO verification endpoint.
///
/// Only `user_id` is required; any further fields the service sends are kept
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl RemoteProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            email: None,
            extra: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// E-mail notification preferences switched on for SSO users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPreference {
    /// Mail when a watched page changes
    WatchlistPages,
    /// Mail when the user's own talk page changes
    UserTalkPages,
    /// Also mail for minor edits
    MinorEdits,
    /// Reveal the user's address in notification mails
    RevealAddress,
}

impl NotificationPreference {
    pub const ALL: [NotificationPreference; 4] = [
        NotificationPreference::WatchlistPages,
        NotificationPreference::UserTalkPages,
        NotificationPreference::MinorEdits,
        NotificationPreference::RevealAddress,
    ];

    /// Preference key as understood by the host's preference storage.
    pub fn option_key(self) -> &'static str {
        match self {
            NotificationPreference::WatchlistPages => "enotifwatchlistpages",
            NotificationPreference::UserTalkPages => "enotifusertalkpages",
            NotificationPreference::MinorEdits => "enotifminoredits",
            NotificationPreference::RevealAddress => "enotifrevealaddr",
        }
    }
}

/// A durable local account mirroring a remote identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalUserIdentity {
    pub name: UserName,
    pub real_name: Option<String>,
    pub email: Option<String>,
    /// When the e-mail address was last confirmed by the SSO service
    pub email_authenticated: Option<DateTime<Utc>>,
    /// Security token, rotated on every provisioning
    pub token: Option<String>,
    pub notifications: BTreeSet<NotificationPreference>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LocalUserIdentity {
    pub fn new(name: UserName) -> Self {
        let now = Utc::now();
        Self {
            name,
            real_name: None,
            email: None,
            email_authenticated: None,
            token: None,
            notifications: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_email_authenticated(&self) -> bool {
        self.email.is_some() && self.email_authenticated.is_some()
    }

    pub fn has_notification(&self, preference: NotificationPreference) -> bool {
        self.notifications.contains(&preference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_accepts_plain_names() {
        for name in ["alice", "Alice A", "stephane.gigandet", "user_123", "élodie"] {
            let parsed = UserName::parse(name).unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn test_user_name_rejects_unusable_names() {
        let too_long = "a".repeat(MAX_NAME_BYTES + 1);
        for name in [
            "",
            " alice",
            "alice ",
            "al|ice",
            "a/b",
            "x#y",
            "tab\tname",
            "127.0.0.1",
            "::1",
            too_long.as_str(),
        ] {
            match UserName::parse(name) {
                Err(IdentityError::InvalidUserName(rejected)) => assert_eq!(rejected, name),
                other => panic!("Expected InvalidUserName for {:?}, got: {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_user_name_deserialize_validates() {
        let ok: UserName = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(ok.to_string(), "alice");

        assert!(serde_json::from_str::<UserName>("\"\"").is_err());
    }

    #[test]
    fn test_remote_profile_deserialize() {
        let json = r#"{
            "user_id": "alice",
            "name": "Alice A",
            "email": "a@x.com",
            "country": "fr"
        }"#;

        let profile: RemoteProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.user_id, "alice");
        assert_eq!(profile.name.as_deref(), Some("Alice A"));
        assert_eq!(profile.email.as_deref(), Some("a@x.com"));
        assert_eq!(profile.extra.get("country").unwrap(), "fr");
    }

    #[test]
    fn test_remote_profile_optional_fields() {
        let profile: RemoteProfile = serde_json::from_str(r#"{"user_id": "bob"}"#).unwrap();
        assert_eq!(profile, RemoteProfile::new("bob"));

        let profile: RemoteProfile =
            serde_json::from_str(r#"{"user_id": "bob", "name": null}"#).unwrap();
        assert!(profile.name.is_none());

        assert!(serde_json::from_str::<RemoteProfile>(r#"{"name": "Bob"}"#).is_err());
    }

    #[test]
    fn test_notification_option_keys() {
        let keys: Vec<_> = NotificationPreference::ALL
            .iter()
            .map(|p| p.option_key())
            .collect();
        assert_eq!(
            keys,
            [
                "enotifwatchlistpages",
                "enotifusertalkpages",
                "enotifminoredits",
                "enotifrevealaddr"
            ]
        );
    }

    #[test]
    fn test_new_identity_is_blank() {
        let identity = LocalUserIdentity::new(UserName::parse("alice").unwrap());
        assert!(identity.real_name.is_none());
        assert!(!identity.is_email_authenticated());
        assert!(identity.notifications.is_empty());
        assert!(identity.token.is_none());
    }
}
