use super::ReviewEngine;
use crate::document::DocumentBuffer;
use crate::error::{ReviewError, Result};
use dashmap::DashMap;
use std::sync::{Arc, Mutex, TryLockError};
use tracing::warn;

/// Review engines keyed by document id.
///
/// Each engine runs one call at a time. A call that arrives while another is
/// running on the same session (from another thread, or re-entrantly) is
/// rejected with `SessionBusy` instead of waiting.
pub struct ReviewSessions<O, B> {
    sessions: DashMap<String, Arc<Mutex<ReviewEngine<O, B>>>>,
}

impl<O, B> Default for ReviewSessions<O, B> {
    fn default() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl<O, B> ReviewSessions<O, B>
where
    O: super::DictionaryOracle,
    B: DocumentBuffer,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `engine` under `id`, replacing any previous session.
    pub fn open(&self, id: impl Into<String>, engine: ReviewEngine<O, B>) {
        self.sessions.insert(id.into(), Arc::new(Mutex::new(engine)));
    }

    /// Remove a session. Returns `false` if there was none.
    pub fn close(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Run `f` against the session named `id`.
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut ReviewEngine<O, B>) -> Result<R>,
    ) -> Result<R> {
        // Clone the handle so the map shard is not held while `f` runs.
        let engine = self
            .sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ReviewError::UnknownSession(id.to_string()))?;

        let mut guard = match engine.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(ReviewError::SessionBusy(id.to_string())),
            Err(TryLockError::Poisoned(poisoned)) => {
                warn!(session = id, "review session poisoned by a panic, resetting");
                let mut guard = poisoned.into_inner();
                guard.reset();
                engine.clear_poison();
                guard
            }
        };
        f(&mut guard)
    }
}
