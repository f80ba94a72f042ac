use std::collections::HashMap;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use clerkship_storage::DocumentStore;
use clerkship_wizard::history::{Clock, SystemClock};
use clerkship_wizard::{CaseFiles, Wizard};

use crate::error::ApiError;

/// Default time a session may sit untouched before it is dropped.
pub const DEFAULT_SESSION_IDLE: SignedDuration = SignedDuration::from_mins(60);

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub case: Arc<CaseFiles>,
    pub sessions: SessionRegistry,
    pub history_cap: SignedDuration,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, case: Arc<CaseFiles>, history_cap: SignedDuration) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            store,
            case,
            sessions: SessionRegistry::new(clock.clone(), DEFAULT_SESSION_IDLE),
            history_cap,
            clock,
        }
    }

    /// Replace the clock used by new wizards and by session expiry.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.sessions = SessionRegistry::new(clock.clone(), self.sessions.idle);
        self.clock = clock;
        self
    }

    pub fn with_session_idle(mut self, idle: SignedDuration) -> Self {
        self.sessions = SessionRegistry::new(self.clock.clone(), idle);
        self
    }

    pub fn new_wizard(&self) -> Wizard {
        Wizard::new(self.store.clone(), self.case.clone())
            .with_clock(self.clock.clone())
            .with_history_cap(self.history_cap)
    }
}

struct Entry {
    wizard: Arc<Mutex<Wizard>>,
    last_seen: Timestamp,
}

/// Live wizard sessions by id. Each wizard has its own lock, so one
/// learner's actions run one at a time while learners proceed in parallel.
///
/// Sessions untouched for longer than `idle` are dropped on the next
/// `open` or `get`. Stored answers are unaffected; the learner logs in again.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
    clock: Arc<dyn Clock>,
    idle: SignedDuration,
}

impl SessionRegistry {
    pub fn new(clock: Arc<dyn Clock>, idle: SignedDuration) -> Self {
        Self {
            inner: Arc::default(),
            clock,
            idle,
        }
    }

    pub async fn open(&self, wizard: Wizard) -> (Uuid, Arc<Mutex<Wizard>>) {
        let now = self.clock.now();
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(wizard));
        let mut sessions = self.inner.write().await;
        self.evict_idle(&mut sessions, now);
        sessions.insert(
            id,
            Entry {
                wizard: session.clone(),
                last_seen: now,
            },
        );
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<Mutex<Wizard>>, ApiError> {
        let now = self.clock.now();
        let mut sessions = self.inner.write().await;
        self.evict_idle(&mut sessions, now);
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))?;
        entry.last_seen = now;
        Ok(entry.wizard.clone())
    }

    pub async fn close(&self, id: Uuid) {
        self.inner.write().await.remove(&id);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, Entry>, now: Timestamp) {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.idle);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "idle sessions dropped");
        }
    }
}
