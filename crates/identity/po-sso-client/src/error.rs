//! SSO client error types.

use thiserror::Error;

pub type SsoResult<T> = Result<T, SsoError>;

/// Recoverable failures of the SSO round-trip.
#[derive(Debug, Error)]
pub enum SsoError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("SSO service responded with status {status}")]
    UnsuccessfulResponse { status: u16, body: String },

    #[error("SSO service returned an empty response")]
    EmptyResponse,

    #[error("Invalid SSO response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Invalid SSO endpoint: {0}")]
    UrlError(#[from] url::ParseError),
}
