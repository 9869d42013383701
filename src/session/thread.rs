//! Session state and storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::flow::{FlowView, LeadFlow};
use crate::geocode::QueryGate;

/// Default session timeout (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// One visitor's session.
///
/// Cheap to clone; clones share the same flow.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Unique session identifier.
    id: String,
    /// The visitor's lead flow. Only ever written through [`Session::with_flow`].
    flow: Mutex<LeadFlow>,
    /// Orders overlapping address lookups.
    gate: QueryGate,
    /// Session creation time.
    created_at: DateTime<Utc>,
    /// Last activity time.
    last_activity: RwLock<DateTime<Utc>>,
}

impl Session {
    /// Create a new session with the given ID.
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(SessionInner {
                id,
                flow: Mutex::new(LeadFlow::new()),
                gate: QueryGate::new(),
                created_at: now,
                last_activity: RwLock::new(now),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Run `f` with exclusive access to the flow.
    pub fn with_flow<R>(&self, f: impl FnOnce(&mut LeadFlow) -> R) -> R {
        let out = {
            let mut guard = self
                .inner
                .flow
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        };
        self.touch();
        out
    }

    /// The flow's lock, for the analysis task that resolves it.
    #[must_use]
    pub fn flow(&self) -> &Mutex<LeadFlow> {
        &self.inner.flow
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> FlowView {
        self.with_flow(|flow| flow.view())
    }

    /// Address lookup gate for this session.
    #[must_use]
    pub fn gate(&self) -> &QueryGate {
        &self.inner.gate
    }

    /// Update the last activity timestamp.
    fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    /// Check if the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // Negative elapsed time means clock skew; treat as fresh.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|elapsed| elapsed > timeout)
    }

    /// Get the session age.
    #[must_use]
    pub fn age(&self) -> Duration {
        (Utc::now() - self.inner.created_at)
            .to_std()
            .unwrap_or(Duration::from_secs(0))
    }
}

/// Thread-safe store for sessions.
///
/// Provides methods for creating, retrieving, and cleaning up sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a new session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Session>> {
        self.inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a new session and return it.
    #[must_use]
    pub fn create(&self) -> Session {
        self.create_with_id(Uuid::new_v4().to_string())
    }

    /// Create a new session with a specific ID.
    #[must_use]
    pub fn create_with_id(&self, id: impl Into<String>) -> Session {
        let id = id.into();
        let session = Session::new(id.clone());
        self.write().insert(id, session.clone());
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        self.read().get(id).cloned()
    }

    /// Get a session by ID, or create a fresh one under a new ID.
    ///
    /// Unknown IDs are never adopted, so a client cannot choose its own.
    #[must_use]
    pub fn get_or_create(&self, id: Option<&str>) -> Session {
        id.and_then(|id| self.get(id))
            .unwrap_or_else(|| self.create())
    }

    /// Remove a session by ID.
    pub fn remove(&self, id: &str) -> Option<Session> {
        self.write().remove(id)
    }

    /// Get the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all expired sessions.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_with_timeout(DEFAULT_SESSION_TIMEOUT)
    }

    /// Remove sessions that have been inactive longer than the timeout.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.write();
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_with_timeout(timeout));
        before - guard.len()
    }
}

/// Periodically drop expired sessions.
pub fn spawn_sweeper(store: SessionStore, every: Duration, timeout: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let removed = store.cleanup_expired_with_timeout(timeout);
            if removed > 0 {
                tracing::info!(
                    name: "session.sweep",
                    removed = removed,
                    remaining = store.len(),
                    "Expired sessions removed"
                );
            }
        }
    })
}
