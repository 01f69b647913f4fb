//! Session descriptors and the host session manager.

use crate::config::Priority;
use crate::error::SessionManagerError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use po_identity_core::UserName;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Alphabet of session ids: 32 characters, 5 bits each
const SESSION_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuv";
const SESSION_ID_LENGTH: usize = 32;

/// Generate a fresh random session id
pub fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    (0..SESSION_ID_LENGTH)
        .map(|_| SESSION_ID_ALPHABET[rng.gen_range(0..SESSION_ID_ALPHABET.len())] as char)
        .collect()
}

/// Whether `id` has the shape of an id produced by [`generate_session_id`]
pub fn is_valid_session_id(id: &str) -> bool {
    id.len() == SESSION_ID_LENGTH && id.bytes().all(|b| SESSION_ID_ALPHABET.contains(&b))
}

/// User a session is bound to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub name: UserName,
}

/// Outcome of session resolution for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub provider: String,
    pub id: String,
    pub priority: Priority,
    /// Whether the session was already persisted when it was described
    pub persisted: bool,
    /// Known only for sessions established by this request
    pub user: Option<SessionUser>,
}

/// A session as stored by the session manager
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalSession {
    pub id: String,
    pub provider: String,
    pub user: Option<UserName>,
    pub priority: Priority,
    pub persisted: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LocalSession {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// The host's session manager, which owns sessions once they are created.
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// Look up a live session by id
    async fn get_session(&self, id: &str) -> Result<Option<LocalSession>, SessionManagerError>;

    /// Materialize the described session and persist it
    async fn persist_session(&self, info: &SessionInfo)
    -> Result<LocalSession, SessionManagerError>;
}

/// In-memory implementation of SessionManager
#[derive(Clone)]
pub struct InMemorySessionManager {
    sessions: Arc<RwLock<HashMap<String, LocalSession>>>,
    ttl: Duration,
}

impl InMemorySessionManager {
    /// Create a manager whose sessions live for `ttl_seconds`.
    ///
    /// Fails with [`SessionManagerError::InvalidTtl`] for zero, or for a
    /// lifetime whose expiry time cannot be represented.
    pub fn new(ttl_seconds: u64) -> Result<Self, SessionManagerError> {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .filter(|ttl| *ttl > Duration::zero())
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or(SessionManagerError::InvalidTtl(ttl_seconds))?;

        Ok(Self::with_ttl(ttl))
    }

    fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Remove a session, returning it if it existed
    pub async fn end_session(&self, id: &str) -> Option<LocalSession> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id)
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    #[cfg(test)]
    async fn insert(&self, session: LocalSession) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session);
    }
}

impl Default for InMemorySessionManager {
    fn default() -> Self {
        Self::with_ttl(Duration::hours(24))
    }
}

#[async_trait]
impl SessionManager for InMemorySessionManager {
    async fn get_session(&self, id: &str) -> Result<Option<LocalSession>, SessionManagerError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).filter(|s| !s.is_expired()).cloned())
    }

    async fn persist_session(
        &self,
        info: &SessionInfo,
    ) -> Result<LocalSession, SessionManagerError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            SessionManagerError::Storage("session expiry is out of range".to_string())
        })?;

        let session = LocalSession {
            id: info.id.clone(),
            provider: info.provider.clone(),
            user: info.user.as_ref().map(|u| u.name.clone()),
            priority: info.priority,
            persisted: true,
            created_at: now,
            expires_at,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }
}
