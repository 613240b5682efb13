//! Session storage — one state record per Telegram user.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::session::SessionState;

/// Backend-agnostic session store.
///
/// `get` never fails: unknown users read as a fresh `Idle` session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current state for a user, `Idle` if none stored.
    async fn get(&self, user_id: i64) -> SessionState;

    /// Replace the stored state for a user.
    async fn set(&self, user_id: i64, state: SessionState);

    /// Drop the stored state, resetting the user to `Idle`.
    async fn clear(&self, user_id: i64);
}

/// In-memory store. Sessions do not survive a restart; losing an
/// in-flight form on restart is accepted.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<i64, SessionState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: i64) -> SessionState {
        self.sessions
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn set(&self, user_id: i64, state: SessionState) {
        self.sessions.lock().await.insert(user_id, state);
    }

    async fn clear(&self, user_id: i64) {
        self.sessions.lock().await.remove(&user_id);
    }
}
