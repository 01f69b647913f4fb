//! Session cookie construction.

use crate::config::{SameSitePolicy, SessionCookieOptions};
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

/// Create the cookie carrying a persisted session id.
pub(crate) fn session_cookie(
    name: &str,
    session_id: &str,
    options: &SessionCookieOptions,
) -> Cookie<'static> {
    let mut builder = Cookie::build((name.to_string(), session_id.to_string()))
        .path(options.path.clone())
        .secure(options.secure)
        .http_only(options.http_only)
        .same_site(options.same_site.into());

    if let Some(domain) = &options.domain {
        builder = builder.domain(domain.clone());
    }
    if let Some(seconds) = options.max_age_seconds {
        builder = builder.max_age(Duration::seconds(seconds));
    }

    builder.build()
}

/// Create removal cookie for the session.
pub(crate) fn clear_session_cookie(name: &str, options: &SessionCookieOptions) -> Cookie<'static> {
    let mut builder = Cookie::build((name.to_string(), ""))
        .path(options.path.clone())
        .max_age(Duration::ZERO);

    if let Some(domain) = &options.domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}
