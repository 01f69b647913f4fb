//! SSO cookie payload decoding.

use serde::Serialize;
use std::collections::BTreeMap;

/// Cookie value browsers are left with after the SSO cookie was removed
pub const DELETED_SENTINEL: &str = "deleted";

/// Field every usable payload must carry
pub const USER_ID_FIELD: &str = "user_id";

/// Key/value data carried by the SSO cookie.
///
/// The cookie holds a flat list of alternating keys and values joined by `&`,
/// e.g. `user_id&alice&user_session&abc123`. Decoding is tolerant rather than
/// validating: a trailing key without a value is dropped, and when a key
/// repeats the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SsoCookiePayload(BTreeMap<String, String>);

impl SsoCookiePayload {
    /// Extract a usable payload from a raw cookie value.
    ///
    /// Returns `None` when the cookie is absent, empty, `deleted`, or decodes
    /// to a mapping without a `user_id` field.
    pub fn extract(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.is_empty() || raw == DELETED_SENTINEL {
            return None;
        }

        let payload = Self::decode(raw);
        payload.user_id()?;
        Some(payload)
    }

    /// Decode the pairwise token list without any required-field check
    pub fn decode(raw: &str) -> Self {
        let tokens: Vec<&str> = raw.split('&').collect();

        let fields = tokens
            .chunks_exact(2)
            .map(|pair| (pair[0].to_string(), pair[1].to_string()))
            .collect();

        Self(fields)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID_FIELD)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SsoCookiePayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
