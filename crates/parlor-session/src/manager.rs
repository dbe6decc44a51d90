//! The session manager: tracks which connections are logged in.
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself — it uses a plain
//! `HashMap`. The server holds it behind a `tokio::sync::Mutex` at a
//! higher level; keeping it simple here avoids hidden locking.

use std::collections::HashMap;

use parlor_protocol::PlayerId;

use crate::{Session, SessionError};

/// Registry of every authenticated player currently connected.
///
/// The lobby consults this for exactly two things: the yes/no
/// "is logged in" capability check, and the display name.
#[derive(Default)]
pub struct SessionManager {
    sessions: HashMap<PlayerId, Session>,
}

impl SessionManager {
    /// Creates a new, empty session manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted login.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyLoggedIn`] if the connection
    /// already holds a session.
    pub fn create(
        &mut self,
        player_id: PlayerId,
        display_name: String,
    ) -> Result<&Session, SessionError> {
        if self.sessions.contains_key(&player_id) {
            return Err(SessionError::AlreadyLoggedIn(player_id));
        }

        self.sessions.insert(
            player_id,
            Session {
                player_id,
                display_name,
            },
        );
        tracing::info!(%player_id, "session created");

        Ok(self
            .sessions
            .get(&player_id)
            .expect("just inserted"))
    }

    /// Removes a session, returning it if one existed.
    ///
    /// Called from the disconnect path, and when a logged-in
    /// connection re-registers as a game server.
    pub fn remove(&mut self, player_id: PlayerId) -> Option<Session> {
        let removed = self.sessions.remove(&player_id);
        if removed.is_some() {
            tracing::info!(%player_id, "session removed");
        }
        removed
    }

    /// Returns `true` if the connection is an authenticated player.
    pub fn is_logged_in(&self, player_id: PlayerId) -> bool {
        self.sessions.contains_key(&player_id)
    }

    /// Returns the display name assigned at login, if logged in.
    pub fn display_name(&self, player_id: PlayerId) -> Option<&str> {
        self.sessions
            .get(&player_id)
            .map(|s| s.display_name.as_str())
    }

    /// Number of active sessions.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let mut mgr = SessionManager::new();
        mgr.create(PlayerId(1), "ada".into()).unwrap();

        assert!(mgr.is_logged_in(PlayerId(1)));
        assert_eq!(mgr.display_name(PlayerId(1)), Some("ada"));
        assert_eq!(mgr.count(), 1);
    }

    #[test]
    fn test_create_twice_fails() {
        let mut mgr = SessionManager::new();
        mgr.create(PlayerId(1), "ada".into()).unwrap();
        let err = mgr.create(PlayerId(1), "eve".into()).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyLoggedIn(PlayerId(1))));
        // The original name is untouched.
        assert_eq!(mgr.display_name(PlayerId(1)), Some("ada"));
    }

    #[test]
    fn test_remove_clears_capability() {
        let mut mgr = SessionManager::new();
        mgr.create(PlayerId(1), "ada".into()).unwrap();

        let removed = mgr.remove(PlayerId(1)).expect("session existed");
        assert_eq!(removed.display_name, "ada");
        assert!(!mgr.is_logged_in(PlayerId(1)));
        assert!(mgr.remove(PlayerId(1)).is_none());
    }
}
