//! Session Store
//!
//! Keeps each browser session's intent-gate state in memory. Nothing is
//! persisted; a restart forgets every session, and sessions older than the
//! store's TTL are treated as gone.

use chrono::{DateTime, Duration, Utc};
use eco_detective_core::gate::{Attitude, GateUpdate, SessionContext};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::models::SessionView;

/// How long a session outlives its creation.
pub const SESSION_TTL_HOURS: i64 = 12;

struct Entry {
    context: SessionContext,
    created_at: DateTime<Utc>,
}

/// A wrapper around the session map to provide a clear data access interface.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::hours(SESSION_TTL_HOURS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn is_live(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.created_at < self.ttl
    }

    /// Creates a new session with every section hidden, dropping expired ones.
    pub async fn create_session(&self) -> SessionView {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let entry = Entry {
            context: SessionContext::new(id),
            created_at: now,
        };
        let view = SessionView::new(&entry.context, entry.created_at);

        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, e| self.is_live(e, now));
        if sessions.len() < before {
            debug!(pruned = before - sessions.len(), "Expired sessions removed");
        }
        sessions.insert(id, entry);
        view
    }

    pub async fn get_session(&self, id: Uuid) -> Option<SessionView> {
        let now = Utc::now();
        self.sessions
            .lock()
            .await
            .get(&id)
            .filter(|e| self.is_live(e, now))
            .map(|e| SessionView::new(&e.context, e.created_at))
    }

    /// Applies a gate choice to a session. Returns `None` for an unknown or
    /// expired session.
    pub async fn choose(&self, id: Uuid, attitude: Attitude) -> Option<GateUpdate> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(&id)?;
        if !self.is_live(entry, now) {
            return None;
        }
        Some(entry.context.choose(attitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_session() {
        let store = SessionStore::new();
        let created = store.create_session().await;

        let fetched = store.get_session(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert!(fetched.attitude.is_none());
        assert!(!fetched.visibility.tools);
        assert_eq!(store.sessions.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_choose_updates_only_that_session() {
        let store = SessionStore::new();
        let a = store.create_session().await;
        let b = store.create_session().await;

        let update = store.choose(a.id, Attitude::Good).await.unwrap();
        assert!(update.visibility.tools);

        let a = store.get_session(a.id).await.unwrap();
        let b = store.get_session(b.id).await.unwrap();
        assert_eq!(a.attitude, Some(Attitude::Good));
        assert!(a.visibility.quiz);
        assert!(b.attitude.is_none());
        assert!(!b.visibility.quiz);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new();
        assert!(store.get_session(Uuid::new_v4()).await.is_none());
        assert!(store.choose(Uuid::new_v4(), Attitude::Bad).await.is_none());
    }

    async fn age(store: &SessionStore, id: Uuid, by: Duration) {
        let mut sessions = store.sessions.lock().await;
        let entry = sessions.get_mut(&id).unwrap();
        entry.created_at -= by;
    }

    #[tokio::test]
    async fn test_expired_session_is_gone() {
        let store = SessionStore::with_ttl(Duration::minutes(30));
        let old = store.create_session().await;
        age(&store, old.id, Duration::minutes(31)).await;

        assert!(store.get_session(old.id).await.is_none());
        assert!(store.choose(old.id, Attitude::Good).await.is_none());
    }

    #[tokio::test]
    async fn test_create_session_prunes_expired_entries() {
        let store = SessionStore::with_ttl(Duration::minutes(30));
        let old = store.create_session().await;
        let recent = store.create_session().await;
        age(&store, old.id, Duration::hours(1)).await;

        let fresh = store.create_session().await;

        let sessions = store.sessions.lock().await;
        assert_eq!(sessions.len(), 2);
        assert!(!sessions.contains_key(&old.id));
        assert!(sessions.contains_key(&recent.id));
        assert!(sessions.contains_key(&fresh.id));
    }
}
