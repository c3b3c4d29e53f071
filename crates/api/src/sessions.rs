//! In-memory visitor sessions.
//!
//! Each session owns one [`Navigator`]. Nothing is persisted; closing a
//! session, leaving it idle past the store's timeout, or restarting the
//! server discards its state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use adspace_core::navigation::Navigator;
use tokio::sync::RwLock;
use uuid::Uuid;

/// How often the background reaper sweeps idle sessions.
const REAP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),

    #[error("Session limit of {0} reached")]
    LimitReached(usize),
}

struct Session {
    navigator: Navigator,
    /// Milliseconds since the store's epoch at the last read or update.
    last_touched_ms: AtomicU64,
}

/// Open sessions keyed by id, capped at `max_sessions`.
///
/// Sessions untouched for `idle_timeout` are evicted, either lazily when the
/// cap is hit or by [`start_session_reaper`]. Thread-safe via interior
/// `RwLock`; wrap in `Arc` to share.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    max_sessions: usize,
    idle_timeout: Duration,
    epoch: Instant,
}

impl SessionStore {
    pub fn new(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            idle_timeout,
            epoch: Instant::now(),
        }
    }

    /// Open a session. `make` receives the new id so the navigator's
    /// listener can be bound to it.
    pub async fn open(
        &self,
        make: impl FnOnce(Uuid) -> Navigator,
    ) -> Result<Uuid, SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            self.remove_idle(&mut sessions);
        }
        if sessions.len() >= self.max_sessions {
            return Err(SessionError::LimitReached(self.max_sessions));
        }
        let id = Uuid::now_v7();
        sessions.insert(
            id,
            Session {
                navigator: make(id),
                last_touched_ms: AtomicU64::new(self.now_ms()),
            },
        );
        Ok(id)
    }

    pub async fn read<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&Navigator) -> R,
    ) -> Result<R, SessionError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or(SessionError::NotFound(id))?;
        session.last_touched_ms.store(self.now_ms(), Ordering::Relaxed);
        Ok(f(&session.navigator))
    }

    /// Run `f` against the session's navigator under the write lock.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Navigator) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        *session.last_touched_ms.get_mut() = self.now_ms();
        Ok(f(&mut session.navigator))
    }

    pub async fn close(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(SessionError::NotFound(id))
    }

    /// Drop every session idle for at least the timeout. Returns how many
    /// were removed.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.remove_idle(&mut sessions)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn remove_idle(&self, sessions: &mut HashMap<Uuid, Session>) -> usize {
        let now = self.now_ms();
        let timeout = u64::try_from(self.idle_timeout.as_millis()).unwrap_or(u64::MAX);
        let before = sessions.len();
        sessions.retain(|_, session| {
            now.saturating_sub(*session.last_touched_ms.get_mut()) < timeout
        });
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Evicted idle sessions");
        }
        removed
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Spawn a background task that periodically evicts idle sessions.
///
/// Runs until aborted through the returned handle.
pub fn start_session_reaper(store: Arc<SessionStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REAP_INTERVAL);

        loop {
            interval.tick().await;
            let removed = store.evict_idle().await;
            tracing::debug!(removed, "Session reaper sweep");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use adspace_core::catalog::Catalog;
    use adspace_core::navigation::{NoopListener, View};

    const LONG: Duration = Duration::from_secs(3600);

    fn navigator(_id: Uuid) -> Navigator {
        Navigator::new(Catalog::builtin(), Arc::new(NoopListener))
    }

    #[tokio::test]
    async fn open_update_close() {
        let store = SessionStore::new(10, LONG);
        let id = store.open(navigator).await.unwrap();
        assert_eq!(store.len().await, 1);

        let view = store.update(id, |nav| nav.go_profile("mag2")).await.unwrap();
        assert_eq!(view, View::Profile);
        assert_eq!(store.read(id, |nav| nav.view()).await.unwrap(), View::Profile);

        store.close(id).await.unwrap();
        assert!(store.is_empty().await);
        assert_eq!(store.close(id).await, Err(SessionError::NotFound(id)));
    }

    #[tokio::test]
    async fn limit_is_enforced() {
        let store = SessionStore::new(1, LONG);
        store.open(navigator).await.unwrap();
        assert_eq!(
            store.open(navigator).await,
            Err(SessionError::LimitReached(1))
        );
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = SessionStore::new(1, LONG);
        let id = Uuid::new_v4();
        assert_eq!(
            store.read(id, |nav| nav.view()).await,
            Err(SessionError::NotFound(id))
        );
    }

    // -- idle eviction --

    #[tokio::test]
    async fn abandoned_sessions_free_their_slots() {
        let store = SessionStore::new(3, Duration::from_millis(50));
        let mut abandoned = Vec::new();
        for _ in 0..3 {
            abandoned.push(store.open(navigator).await.unwrap());
        }

        tokio::time::sleep(Duration::from_millis(120)).await;

        let fresh = store.open(navigator).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.read(fresh, |nav| nav.view()).await.is_ok());
        for id in abandoned {
            assert_eq!(
                store.read(id, |nav| nav.view()).await,
                Err(SessionError::NotFound(id))
            );
        }
    }

    #[tokio::test]
    async fn touched_sessions_survive_eviction() {
        let store = SessionStore::new(10, Duration::from_millis(400));
        let active = store.open(navigator).await.unwrap();
        let idle = store.open(navigator).await.unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;
        store.read(active, |nav| nav.view()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(store.evict_idle().await, 1);
        assert!(store.read(active, |nav| nav.view()).await.is_ok());
        assert_eq!(
            store.read(idle, |nav| nav.view()).await,
            Err(SessionError::NotFound(idle))
        );
    }

    #[tokio::test]
    async fn open_sessions_are_kept_below_the_cap() {
        let store = SessionStore::new(2, Duration::from_millis(50));
        store.open(navigator).await.unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        // Under the cap, opening does not sweep.
        store.open(navigator).await.unwrap();
        assert_eq!(store.len().await, 2);
    }
}
