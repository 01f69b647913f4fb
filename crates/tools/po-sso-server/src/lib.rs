//! Reference host for the Product Opener SSO session provider.
//!
//! Exposes `GET /session`, which resolves (and when needed establishes) the
//! caller's session, and `POST /logout`, which ends it.

pub mod config;
pub mod routes;

pub use config::Settings;
pub use routes::{AppState, router};
