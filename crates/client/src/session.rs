//! Session manager.
//!
//! Owns the `currentUser` entry of the key-value store. Nothing is cached in
//! process: every read goes to the store, so state written through one handle
//! (or by an earlier run) is what every other handle observes.
//!
//! Navigation after logout is the caller's concern; this module only owns
//! storage state.

use shopfront_core::SessionIdentity;
use tracing::debug;

use crate::storage::{Storage, keys};

/// Reads and writes the current session.
#[derive(Debug, Clone)]
pub struct SessionManager {
    storage: Storage,
}

impl SessionManager {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// The store this manager reads from.
    #[must_use]
    pub const fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The logged-in user, or `None` if there is no session or the stored
    /// record does not parse.
    #[must_use]
    pub fn current_session(&self) -> Option<SessionIdentity> {
        self.storage.get(keys::CURRENT_USER)
    }

    /// Whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    /// Persist `identity` as the current session, replacing any previous one.
    pub fn establish(&self, identity: &SessionIdentity) {
        self.storage.set(keys::CURRENT_USER, identity);
        debug!(user_id = %identity.id, "Session established");
    }

    /// Remove the current session. Ending a session that does not exist is a no-op.
    pub fn end(&self) {
        self.storage.remove(keys::CURRENT_USER);
        debug!("Session ended");
    }
}
