//! Persisted admin session with a fixed lifetime.
//!
//! The session lives under a single storage key. Reading it is also the
//! expiry check: a session whose age has reached the lifetime is deleted and
//! reported as absent. Corrupt stored data is treated the same way as no
//! data at all.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::models::session::{AdminSession, keys};
use crate::storage::{KeyValueStore, StorageError};

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Reads and writes the [`AdminSession`] in client storage.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    ttl: TimeDelta,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Persist a session, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be written.
    pub fn save(&self, session: &AdminSession) -> Result<(), StorageError> {
        let json = serde_json::to_string(session)?;
        self.store.set(keys::ADMIN_SESSION, &json)?;
        debug!(admin_id = %session.id, "Session saved");
        Ok(())
    }

    /// The stored session if it is still valid now.
    #[must_use]
    pub fn read(&self) -> Option<AdminSession> {
        self.read_at(Utc::now())
    }

    /// The stored session if it is still valid at `now`.
    ///
    /// An expired session is removed from storage as a side effect.
    #[must_use]
    pub fn read_at(&self, now: DateTime<Utc>) -> Option<AdminSession> {
        let session = self.load()?;
        if self.is_expired(&session, now) {
            debug!(admin_id = %session.id, "Session expired");
            if let Err(e) = self.clear() {
                warn!(error = %e, "Failed to remove expired session");
            }
            return None;
        }
        Some(session)
    }

    /// Delete the stored session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::ADMIN_SESSION)
    }

    /// The instant the stored session stops being valid, without checking it.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.load().map(|session| self.expiry_of(&session))
    }

    /// A session is valid while its age is strictly below the lifetime.
    #[must_use]
    pub fn is_expired(&self, session: &AdminSession, now: DateTime<Utc>) -> bool {
        now >= self.expiry_of(session)
    }

    fn expiry_of(&self, session: &AdminSession) -> DateTime<Utc> {
        session
            .login_time
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn load(&self) -> Option<AdminSession> {
        let raw = match self.store.get(keys::ADMIN_SESSION) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed stored session");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use portfolio_admin_core::{AdminRole, AdminUserId, Email};

    fn session(login_time: DateTime<Utc>) -> AdminSession {
        AdminSession {
            id: AdminUserId::new(uuid::Uuid::new_v4()),
            email: Email::parse("admin@example.com").unwrap(),
            full_name: "Site Admin".to_string(),
            role: AdminRole::SuperAdmin,
            is_active: true,
            login_time,
        }
    }

    fn store() -> (SessionStore, MemoryStore) {
        let memory = MemoryStore::new();
        (
            SessionStore::new(Arc::new(memory.clone()), DEFAULT_SESSION_TTL),
            memory,
        )
    }

    #[test]
    fn test_session_older_than_ttl_is_cleared() {
        let (sessions, memory) = store();
        let now = Utc::now();
        sessions.save(&session(now - TimeDelta::hours(25))).unwrap();

        assert_eq!(sessions.read_at(now), None);
        assert_eq!(memory.get(keys::ADMIN_SESSION).unwrap(), None);
    }

    #[test]
    fn test_recent_session_is_returned_unchanged() {
        let (sessions, memory) = store();
        let now = Utc::now();
        let saved = session(now - TimeDelta::hours(1));
        sessions.save(&saved).unwrap();

        assert_eq!(sessions.read_at(now), Some(saved));
        assert!(memory.get(keys::ADMIN_SESSION).unwrap().is_some());
    }

    #[test]
    fn test_session_exactly_at_ttl_is_expired() {
        let (sessions, _) = store();
        let now = Utc::now();
        sessions.save(&session(now - TimeDelta::hours(24))).unwrap();

        assert_eq!(sessions.read_at(now), None);
    }

    #[test]
    fn test_future_login_time_is_valid() {
        let (sessions, _) = store();
        let now = Utc::now();
        sessions.save(&session(now + TimeDelta::minutes(5))).unwrap();

        assert!(sessions.read_at(now).is_some());
    }

    #[test]
    fn test_malformed_session_reads_as_none() {
        let (sessions, memory) = store();
        memory.set(keys::ADMIN_SESSION, "{not json").unwrap();
        assert_eq!(sessions.read(), None);

        memory
            .set(keys::ADMIN_SESSION, r#"{"id":"x","email":"a@b.co"}"#)
            .unwrap();
        assert_eq!(sessions.read(), None);
    }

    #[test]
    fn test_clear_and_expires_at() {
        let (sessions, _) = store();
        assert_eq!(sessions.expires_at(), None);

        let login = Utc::now();
        sessions.save(&session(login)).unwrap();
        assert_eq!(sessions.expires_at(), Some(login + TimeDelta::hours(24)));

        sessions.clear().unwrap();
        assert_eq!(sessions.read(), None);
        // Clearing an empty store is not an error.
        sessions.clear().unwrap();
    }
}
