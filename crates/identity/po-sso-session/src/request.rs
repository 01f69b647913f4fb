//! Inbound request view.

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use std::collections::HashMap;

/// The parts of an inbound request the provider reads: its cookies.
///
/// Values are stored decoded, the way hosts hand cookies to application code.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    cookies: HashMap<String, String>,
}

impl InboundRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect already parsed cookies. When a name repeats, the last one wins.
    pub fn from_cookies<'a, 'c: 'a>(cookies: impl IntoIterator<Item = &'a Cookie<'c>>) -> Self {
        let cookies = cookies
            .into_iter()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();

        Self { cookies }
    }

    /// Parse a `Cookie` request header (`a=1; b=2`), percent-decoding values.
    ///
    /// Pairs that do not parse are skipped, the same way [`CookieJar`] skips
    /// them.
    pub fn from_cookie_header(header: &str) -> Self {
        let cookies: Vec<Cookie<'_>> = Cookie::split_parse_encoded(header)
            .filter_map(Result::ok)
            .collect();

        Self::from_cookies(&cookies)
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

impl From<&CookieJar> for InboundRequest {
    fn from(jar: &CookieJar) -> Self {
        Self::from_cookies(jar.iter())
    }
}
