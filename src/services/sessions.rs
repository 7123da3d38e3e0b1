use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::models::SessionRecord;

/// Shared handle to one session's history. Holding the lock serializes the
/// whole read-modify-write of a single message.
pub type SessionHandle = Arc<tokio::sync::Mutex<SessionRecord>>;

struct Entry {
    record: SessionHandle,
    last_seen: Instant,
}

/// In-memory conversation histories keyed by session id.
///
/// Sessions are created lazily and dropped once idle for longer than the
/// configured TTL. Nothing survives a restart.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    /// `ttl` of `None` keeps sessions for the life of the process.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get_or_create(&self, session_id: &str) -> SessionHandle {
        let now = Instant::now();
        let mut sessions = self.lock();
        self.evict_locked(&mut sessions, now);

        let entry = sessions.entry(session_id.to_string()).or_insert_with(|| {
            tracing::debug!(session_id, "creating session");
            Entry {
                record: Arc::new(tokio::sync::Mutex::new(SessionRecord::new(session_id))),
                last_seen: now,
            }
        });
        entry.last_seen = now;
        Arc::clone(&entry.record)
    }

    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.lock().get(session_id).map(|e| Arc::clone(&e.record))
    }

    /// Marks the session as active now. Called when a message finishes so a
    /// slow turn does not count as idle time.
    pub fn touch(&self, session_id: &str) {
        if let Some(entry) = self.lock().get_mut(session_id) {
            entry.last_seen = Instant::now();
        }
    }

    pub fn remove(&self, session_id: &str) -> bool {
        self.lock().remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops sessions idle since before `now - ttl`. Sessions whose handle is
    /// still held by a request are kept. Returns how many were removed.
    pub fn evict_idle(&self, now: Instant) -> usize {
        let mut sessions = self.lock();
        self.evict_locked(&mut sessions, now)
    }

    fn evict_locked(&self, sessions: &mut HashMap<String, Entry>, now: Instant) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };

        let before = sessions.len();
        sessions.retain(|_, e| {
            Arc::strong_count(&e.record) > 1 || now.saturating_duration_since(e.last_seen) <= ttl
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "evicted idle sessions");
        }
        evicted
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // a poisoned map only means another request panicked mid-insert
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
