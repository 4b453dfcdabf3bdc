//! Profile editing for the logged-in user.

use shopfront_core::forms::ProfileUpdate;
use shopfront_core::{SessionIdentity, UserId};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, UserDirectoryClient};
use crate::session::SessionManager;

/// Errors that can occur when updating a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("log in to edit your profile")]
    NotAuthenticated,

    #[error("user {0} no longer exists")]
    NotFound(UserId),

    #[error("profile update failed: {0}")]
    Api(#[from] ApiError),
}

/// Applies profile edits to the directory and keeps the session in step.
#[derive(Debug, Clone)]
pub struct ProfileService {
    users: UserDirectoryClient,
    sessions: SessionManager,
}

impl ProfileService {
    #[must_use]
    pub const fn new(users: UserDirectoryClient, sessions: SessionManager) -> Self {
        Self { users, sessions }
    }

    /// Change the current user's username and email.
    ///
    /// The full directory record is fetched and written back with the new
    /// values, so the password and role are preserved. On success the session
    /// is replaced with the updated record's session fields.
    ///
    /// # Errors
    ///
    /// - `ProfileError::NotAuthenticated` without a session
    /// - `ProfileError::NotFound` if the directory no longer has the user
    /// - `ProfileError::Api` if a request fails
    #[instrument(skip(self, update), fields(username = %update.username))]
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<SessionIdentity, ProfileError> {
        let session = self
            .sessions
            .current_session()
            .ok_or(ProfileError::NotAuthenticated)?;

        let mut identity = self.users.get_user(session.id).await?.ok_or_else(|| {
            warn!(user_id = %session.id, "Session user missing from directory");
            ProfileError::NotFound(session.id)
        })?;

        identity.username.clone_from(&update.username);
        identity.email = update.email.clone();

        self.users
            .update_user(&identity)
            .await
            .map_err(|e| match e {
                ApiError::NotFound(_) => ProfileError::NotFound(identity.id),
                other => ProfileError::Api(other),
            })?;

        let refreshed = identity.session();
        self.sessions.establish(&refreshed);
        info!(user_id = %refreshed.id, "Profile updated");
        Ok(refreshed)
    }
}
