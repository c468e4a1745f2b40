//! Session store — maps opaque cookie tokens to authenticated identities
//!
//! Sessions live in process memory only. There is no logout route, so a
//! session ends only with the process or when the browser drops the cookie;
//! the store itself has no delete operation.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_id";

/// Immutable identity attached to a request once its session resolves
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i32,
    pub name: String,
}

/// Thread-safe registry of active login sessions
pub struct SessionStore {
    sessions: DashMap<String, SessionUser>,
}

/// Shared, reference-counted session store
pub type SharedSessionStore = Arc<SessionStore>;

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Wrap in `Arc` for shared ownership
    pub fn shared() -> SharedSessionStore {
        Arc::new(Self::new())
    }

    /// Create a session for an authenticated user, returning the new token
    pub fn create(&self, user: SessionUser) -> String {
        let token = Uuid::new_v4().to_string();
        info!(user_id = user.user_id, "session established");
        self.sessions.insert(token.clone(), user);
        token
    }

    /// Resolve a token to its identity, if the session exists
    pub fn resolve(&self, token: &str) -> Option<SessionUser> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Number of active sessions
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
