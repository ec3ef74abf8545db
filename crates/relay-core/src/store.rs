//! Session Store
//!
//! The authoritative mapping from session id to session state, plus the
//! expiry sweep. Three paths interleave over one store instance: the HTTP
//! request path (create, get), the operator webhook path (resolve), and the
//! periodic sweep (delete). All mutations serialize through a single write
//! lock, so once `resolve` returns, any concurrent `get` observes the
//! resolved state.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{Duration, Utc};

use crate::error::{RelayError, Result};
use crate::session::{Session, SessionId, SessionState};

/// Outcome of a resolution attempt
#[derive(Clone, Debug)]
pub enum ResolveOutcome {
    /// Link attached; returns the updated session
    Resolved(Session),

    /// No live session with that id (never created, or swept)
    NotFound,

    /// Session already carries a link; the stored link is never overwritten
    AlreadyResolved,
}

/// What a polling browser observes for a session id
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStatus {
    NotFound,
    Waiting,
    Ready { payment_link: String },
}

/// Session storage trait
///
/// Injected as `Arc<dyn SessionStore>` so the in-memory store can be swapped
/// for a test double or a networked store without touching callers.
pub trait SessionStore: Send + Sync {
    /// Insert a new pending session. Fails on a live id collision; callers
    /// guarantee uniqueness at the generation layer, the store never retries.
    fn create(&self, session: Session) -> Result<()>;

    /// Pure lookup. Never extends or resets the entry's expiry, so polling
    /// cannot keep a session alive indefinitely.
    fn get(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Attach a payment link and transition to resolved.
    fn resolve(&self, id: &SessionId, payment_link: &str) -> Result<ResolveOutcome>;

    /// Remove every entry older than `max_age`, regardless of state.
    /// Returns the number of removed entries.
    fn sweep(&self, max_age: Duration) -> Result<usize>;

    /// Read-only three-way status for the polling endpoint.
    fn status(&self, id: &SessionId) -> Result<PollStatus> {
        Ok(match self.get(id)? {
            None => PollStatus::NotFound,
            Some(session) => match session.payment_link {
                Some(payment_link) => PollStatus::Ready { payment_link },
                None => PollStatus::Waiting,
            },
        })
    }
}

/// In-memory session store
///
/// There is exactly one process and one store instance; a mutex-guarded map
/// is the whole concurrency story.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, session: Session) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        if sessions.contains_key(&session.id) {
            return Err(RelayError::DuplicateSession(session.id.to_string()));
        }

        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    fn get(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| RelayError::Storage(e.to_string()))?;
        Ok(sessions.get(id).cloned())
    }

    fn resolve(&self, id: &SessionId, payment_link: &str) -> Result<ResolveOutcome> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let Some(session) = sessions.get_mut(id) else {
            return Ok(ResolveOutcome::NotFound);
        };

        if session.state == SessionState::Resolved {
            return Ok(ResolveOutcome::AlreadyResolved);
        }

        session.payment_link = Some(payment_link.to_string());
        session.state = SessionState::Resolved;

        Ok(ResolveOutcome::Resolved(session.clone()))
    }

    fn sweep(&self, max_age: Duration) -> Result<usize> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let cutoff = Utc::now() - max_age;
        let before = sessions.len();
        sessions.retain(|_, session| session.created_at > cutoff);

        Ok(before - sessions.len())
    }
}
