//! Per-session dialog stack persistence.
//!
//! The stack is stored as an opaque blob keyed by session id: read at turn
//! start, written at turn end, last-write-wins. A session has exactly one
//! writer at a time, so no optimistic concurrency is needed here.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::SessionError;

/// Session state store contract. Production swaps the in-memory map for a
/// real backend without changing the contract.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Result<Option<String>, SessionError>;

    /// Replace any prior value for the session.
    async fn save(&self, session_id: &str, blob: String) -> Result<(), SessionError>;

    async fn remove(&self, session_id: &str) -> Result<(), SessionError>;
}

/// In-memory session store — a map behind an async lock.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<String>, SessionError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn save(&self, session_id: &str, blob: String) -> Result<(), SessionError> {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), blob);
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}
