//! In-memory session store with idle expiry.

use crate::session::{Mode, SessionError};
use crate::variant::{AnySession, GameView, MoveInput, NewGame, Variant};
use chrono::{DateTime, TimeDelta, Utc};
use derive_getters::Getters;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Store limits.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct StoreSettings {
    /// Most sessions held at once.
    max_sessions: usize,
    /// Sessions untouched for longer than this are evicted.
    idle_timeout: Duration,
    /// Base seed for opponent randomness. `None` seeds from the OS.
    ai_seed: Option<u64>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::new(1024, Duration::from_secs(30 * 60), None)
    }
}

/// Why a store operation failed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum StoreError {
    /// No session has this id.
    #[display("Game {} not found", _0)]
    #[from(ignore)]
    NotFound(Uuid),
    /// The store already holds `max_sessions` sessions.
    #[display("Session limit of {} reached", _0)]
    #[from(ignore)]
    Full(usize),
    /// The session refused the request.
    #[display("{}", _0)]
    Session(SessionError),
}

impl std::error::Error for StoreError {}

/// A session as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct SessionSnapshot {
    /// Session id.
    id: Uuid,
    /// When the session was created.
    created_at: DateTime<Utc>,
    /// Last time the session was created, moved or reset.
    last_active: DateTime<Utc>,
    /// Game state.
    #[serde(flatten)]
    game: GameView,
}

/// Short listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Session id.
    pub id: Uuid,
    /// Which game.
    pub variant: Variant,
    /// Who plays the second side.
    pub mode: Mode,
    /// True once the game has ended.
    pub finished: bool,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last activity.
    pub last_active: DateTime<Utc>,
}

#[derive(Debug)]
struct Entry {
    session: AnySession,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl Entry {
    fn snapshot(&self, id: Uuid) -> SessionSnapshot {
        SessionSnapshot {
            id,
            created_at: self.created_at,
            last_active: self.last_active,
            game: self.session.view(),
        }
    }
}

/// Sessions keyed by id.
///
/// Every operation on a session runs under the store lock, so moves
/// against one id are applied one at a time.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
    settings: StoreSettings,
    seeds: Arc<AtomicU64>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(StoreSettings::default())
    }
}

impl SessionStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new(settings: StoreSettings) -> Self {
        info!("Creating session store");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            settings,
            seeds: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Limits in force.
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeded stores give every session its own deterministic stream.
    fn next_rng(&self) -> StdRng {
        match self.settings.ai_seed {
            Some(seed) => {
                let n = self.seeds.fetch_add(1, Ordering::Relaxed);
                StdRng::seed_from_u64(seed.wrapping_add(n))
            }
            None => StdRng::from_os_rng(),
        }
    }

    /// Starts a new session.
    #[instrument(skip(self))]
    pub fn create(&self, request: &NewGame) -> Result<SessionSnapshot, StoreError> {
        let session = AnySession::create(request, self.next_rng())?;

        let mut sessions = self.lock();
        if sessions.len() >= self.settings.max_sessions {
            warn!(count = sessions.len(), "Session limit reached");
            return Err(StoreError::Full(self.settings.max_sessions));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let entry = Entry {
            session,
            created_at: now,
            last_active: now,
        };
        let snapshot = entry.snapshot(id);
        sessions.insert(id, entry);

        info!(session_id = %id, variant = %request.variant, mode = %request.mode, "Created session");
        Ok(snapshot)
    }

    /// Current state of a session.
    #[instrument(skip(self))]
    pub fn view(&self, id: Uuid) -> Result<SessionSnapshot, StoreError> {
        let sessions = self.lock();
        sessions
            .get(&id)
            .map(|entry| entry.snapshot(id))
            .ok_or_else(|| {
                debug!(session_id = %id, "Session not found");
                StoreError::NotFound(id)
            })
    }

    /// Applies a move. The flag is false when the game was already over.
    #[instrument(skip(self))]
    pub fn apply_move(
        &self,
        id: Uuid,
        input: &MoveInput,
    ) -> Result<(bool, SessionSnapshot), StoreError> {
        let mut sessions = self.lock();
        let entry = sessions.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let accepted = entry.session.apply_move(input)?;
        if accepted {
            entry.last_active = Utc::now();
        }
        Ok((accepted, entry.snapshot(id)))
    }

    /// Restores a session to its starting position.
    #[instrument(skip(self))]
    pub fn reset(&self, id: Uuid) -> Result<SessionSnapshot, StoreError> {
        let mut sessions = self.lock();
        let entry = sessions.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        entry.session.reset()?;
        entry.last_active = Utc::now();
        Ok(entry.snapshot(id))
    }

    /// Drops a session.
    #[instrument(skip(self))]
    pub fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        sessions
            .remove(&id)
            .map(|_| info!(session_id = %id, "Removed session"))
            .ok_or(StoreError::NotFound(id))
    }

    /// All sessions, oldest first.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions = self.lock();
        let mut list: Vec<SessionSummary> = sessions
            .iter()
            .map(|(id, entry)| SessionSummary {
                id: *id,
                variant: entry.session.variant(),
                mode: entry.session.mode(),
                finished: entry.session.is_over(),
                created_at: entry.created_at,
                last_active: entry.last_active,
            })
            .collect();
        list.sort_by_key(|s| s.created_at);
        debug!(count = list.len(), "Listed sessions");
        list
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if no session is live.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes sessions idle for longer than the configured timeout as of
    /// `now`. Returns how many were removed.
    #[instrument(skip(self))]
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let max_idle = TimeDelta::from_std(self.settings.idle_timeout).unwrap_or(TimeDelta::MAX);
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_active <= max_idle);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(max_sessions: usize) -> SessionStore {
        SessionStore::new(StoreSettings::new(
            max_sessions,
            Duration::from_secs(60),
            Some(5),
        ))
    }

    #[test]
    fn test_capacity_limit() {
        let store = store(2);
        let request = NewGame::new(Variant::TicTacToe, Mode::Pvp);
        store.create(&request).unwrap();
        store.create(&request).unwrap();
        assert_eq!(store.create(&request), Err(StoreError::Full(2)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_evict_idle() {
        let store = store(8);
        let request = NewGame::new(Variant::Chess, Mode::Pvp);
        let old = store.create(&request).unwrap();
        let fresh = store.create(&request).unwrap();

        // Age the first session past the timeout.
        store
            .lock()
            .get_mut(old.id())
            .unwrap()
            .last_active -= TimeDelta::seconds(120);

        assert_eq!(store.evict_idle(Utc::now()), 1);
        assert_eq!(store.view(*old.id()), Err(StoreError::NotFound(*old.id())));
        assert!(store.view(*fresh.id()).is_ok());
    }

    #[test]
    fn test_remove_unknown() {
        let store = store(1);
        let id = Uuid::new_v4();
        assert_eq!(store.remove(id), Err(StoreError::NotFound(id)));
    }
}
