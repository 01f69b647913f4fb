//! HTTP routes exposing the SSO session provider.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use po_identity_core::IdentityError;
use po_sso_session::{
    InMemorySessionManager, InboundRequest, ResolveError, SessionInfo, SsoSessionProvider,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    provider: Arc<SsoSessionProvider>,
    sessions: Arc<InMemorySessionManager>,
}

impl AppState {
    pub fn new(provider: SsoSessionProvider, sessions: Arc<InMemorySessionManager>) -> Self {
        Self {
            provider: Arc::new(provider),
            sessions,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionResponse {
    Anonymous,
    Active { session: SessionInfo },
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/session", get(session_handler))
        .route("/logout", post(logout_handler))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}

async fn session_handler(State(state): State<AppState>, cookies: CookieJar) -> Response {
    let request = InboundRequest::from(&cookies);

    match state.provider.provide_session_info(&request).await {
        Ok(Some(info)) => {
            let mut jar = CookieJar::new();
            if !info.persisted {
                jar = jar.add(state.provider.session_cookie(&info.id));
            }
            (jar, Json(SessionResponse::Active { session: info })).into_response()
        }
        Ok(None) => Json(SessionResponse::Anonymous).into_response(),
        Err(ResolveError::Identity(IdentityError::InvalidUserName(name))) => {
            warn!("SSO service returned an unusable user name {:?}", name);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid user name" })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Session resolution failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

async fn logout_handler(State(state): State<AppState>, cookies: CookieJar) -> Response {
    let request = InboundRequest::from(&cookies);

    if let Some(id) = state.provider.session_id_from_request(&request) {
        if state.sessions.end_session(&id).await.is_some() {
            info!("Session ended");
        }
    }

    let jar = CookieJar::new().add(state.provider.clear_session_cookie());
    (StatusCode::NO_CONTENT, jar).into_response()
}
