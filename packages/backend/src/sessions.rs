//! Session registry
//!
//! One `TrackingSession` per client session id, created on the first frame
//! and kept until the client ends it or it sits idle past the timeout. The
//! map lock is only held for lookups; frame processing locks the single
//! entry, so frames of one session run in order and sessions never contend
//! with each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};
use wink_cursor_core::{CursorConfig, Pointer, TrackingSession, WinkConfig};

const MAX_SESSION_ID_LEN: usize = 128;

#[derive(Debug)]
pub struct SessionEntry {
    pub session: TrackingSession,
    pub created_at: f64,
    pub last_seen: f64,
}

pub type SharedSession = Arc<Mutex<SessionEntry>>;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SharedSession>>,
    wink: WinkConfig,
    cursor: CursorConfig,
    pointer: Arc<dyn Pointer>,
    idle_timeout: Duration,
}

pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl SessionRegistry {
    pub fn new(
        wink: WinkConfig,
        cursor: CursorConfig,
        pointer: Arc<dyn Pointer>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            wink,
            cursor,
            pointer,
            idle_timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.read().get(id).cloned()
    }

    /// Returns the session for `id`, creating it when absent. The boolean is
    /// true when this call created it.
    pub fn get_or_create(&self, id: &str, now: f64) -> (SharedSession, bool) {
        if let Some(existing) = self.get(id) {
            return (existing, false);
        }

        let mut sessions = self.sessions.write();
        if let Some(existing) = sessions.get(id) {
            return (Arc::clone(existing), false);
        }

        let entry = Arc::new(Mutex::new(SessionEntry {
            session: TrackingSession::new(self.wink, self.cursor, Arc::clone(&self.pointer)),
            created_at: now,
            last_seen: now,
        }));
        sessions.insert(id.to_string(), Arc::clone(&entry));
        info!(session_id = %id, active = sessions.len(), "tracking session created");
        (entry, true)
    }

    /// Runs `f` on the registered entry for `id` while holding its lock,
    /// creating the session when absent. An entry evicted between lookup and
    /// locking is discarded and the lookup retried, so `f` never sees an
    /// orphaned session. The boolean is true when a session was created.
    pub fn with_session<R>(&self, id: &str, now: f64, f: impl FnOnce(&mut SessionEntry) -> R) -> (R, bool) {
        let mut created = false;
        loop {
            let (entry, fresh) = self.get_or_create(id, now);
            created |= fresh;

            let mut guard = entry.lock();
            if self.is_registered(id, &entry) {
                return (f(&mut guard), created);
            }
            debug!(session_id = %id, "session evicted before lock, retrying");
        }
    }

    /// True while `entry` is the instance the registry holds for `id`.
    pub fn is_registered(&self, id: &str, entry: &SharedSession) -> bool {
        self.sessions
            .read()
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, entry))
    }

    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            info!(session_id = %id, "tracking session ended");
        }
        removed
    }

    /// Drops sessions idle for longer than the timeout. Sessions busy with a
    /// frame are skipped; they are by definition not idle.
    pub fn evict_idle(&self, now: f64) -> usize {
        let timeout = self.idle_timeout.as_secs_f64();
        let mut sessions = self.sessions.write();
        let before = sessions.len();

        sessions.retain(|id, entry| match entry.try_lock() {
            Some(guard) => {
                let keep = now - guard.last_seen <= timeout;
                if !keep {
                    debug!(session_id = %id, idle_secs = now - guard.last_seen, "evicting idle session");
                }
                keep
            }
            None => true,
        });

        before - sessions.len()
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }
}
