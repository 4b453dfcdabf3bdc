//! Authentication orchestrator.
//!
//! Sequences the remote register and login calls and records the outcome in
//! the session store.
//!
//! ```text
//! login:     Idle -> Requesting -> Authenticated | Rejected | Failed
//! register:  Idle -> Registering -> RegisterFailed
//!                                 | LoggingIn -> Authenticated | Rejected | Failed
//! ```
//!
//! A registration only counts as a success once the login that follows it
//! succeeds. The login request is issued strictly after the registration
//! response has been observed, and never if registration did not succeed.
//!
//! Inputs are validated by the caller (see `shopfront_core::forms`); the
//! orchestrator does not re-check them.

mod error;

pub use error::{AuthError, Stage};

use shopfront_core::SessionIdentity;
use shopfront_core::forms::{Credentials, Registration};
use tracing::{error, info, instrument, warn};

use crate::api::AuthApi;
use crate::session::SessionManager;

/// Message the auth endpoint returns for a successful registration.
pub const REGISTER_SUCCESS: &str = "User registered successfully";

/// Message the auth endpoint returns for a successful login.
pub const LOGIN_SUCCESS: &str = "Authentication successful";

/// Drives login, registration and logout against an [`AuthApi`].
#[derive(Debug, Clone)]
pub struct AuthOrchestrator<A> {
    api: A,
    sessions: SessionManager,
}

impl<A: AuthApi> AuthOrchestrator<A> {
    #[must_use]
    pub const fn new(api: A, sessions: SessionManager) -> Self {
        Self { api, sessions }
    }

    /// The session manager this orchestrator writes to.
    #[must_use]
    pub const fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Log in and establish a session.
    ///
    /// The session is only touched on success.
    ///
    /// # Errors
    ///
    /// - `AuthError::Rejected` if the endpoint declined the credentials
    /// - `AuthError::MalformedResponse` if success was reported without a
    ///   usable user record
    /// - `AuthError::Transport` if the request failed
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionIdentity, AuthError> {
        let response = self.api.login(credentials).await.map_err(|source| {
            error!(error = %source, "Login request failed");
            AuthError::Transport {
                stage: Stage::Login,
                source,
            }
        })?;

        if response.message != LOGIN_SUCCESS {
            info!(message = %response.message, "Login rejected");
            return Err(AuthError::Rejected {
                message: response.message,
            });
        }

        let user = response.user.ok_or_else(|| {
            warn!("Login succeeded without a user record");
            AuthError::MalformedResponse("missing user".to_string())
        })?;
        let identity: SessionIdentity = serde_json::from_value(user).map_err(|e| {
            warn!(error = %e, "Login returned an unusable user record");
            AuthError::MalformedResponse(e.to_string())
        })?;

        self.sessions.establish(&identity);
        info!(user_id = %identity.id, "User logged in");
        Ok(identity)
    }

    /// Log in, reporting only whether a session was established.
    pub async fn login(&self, credentials: &Credentials) -> bool {
        self.authenticate(credentials).await.is_ok()
    }

    /// Register, then log in with the same credentials.
    ///
    /// # Errors
    ///
    /// - `AuthError::RegistrationRejected` or `AuthError::Transport` (stage
    ///   `Register`) if registration did not succeed; no login is attempted
    /// - any error from [`Self::authenticate`] for the follow-up login
    #[instrument(
        skip(self, registration),
        fields(email = %registration.email, username = %registration.username)
    )]
    pub async fn register_and_login(
        &self,
        registration: &Registration,
    ) -> Result<SessionIdentity, AuthError> {
        let response = self.api.register(registration).await.map_err(|source| {
            error!(error = %source, "Registration request failed");
            AuthError::Transport {
                stage: Stage::Register,
                source,
            }
        })?;

        if response.message != REGISTER_SUCCESS {
            info!(message = %response.message, "Registration rejected");
            return Err(AuthError::RegistrationRejected {
                message: response.message,
            });
        }

        info!("User registered");
        self.authenticate(&registration.credentials()).await
    }

    /// Register and log in, reporting only whether both succeeded.
    pub async fn register(&self, registration: &Registration) -> bool {
        self.register_and_login(registration).await.is_ok()
    }

    /// End the current session, if any.
    pub fn logout(&self) {
        self.sessions.end();
        info!("User logged out");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use secrecy::SecretString;
    use serde_json::{Value, json};
    use shopfront_core::{Email, Role, UserId};

    use super::*;
    use crate::api::{ApiError, AuthResponse};
    use crate::storage::{Storage, keys};

    /// Canned outcome of one remote call.
    #[derive(Clone)]
    enum Reply {
        Message(&'static str, Option<Value>),
        Status(u16),
    }

    impl Reply {
        fn into_result(self) -> Result<AuthResponse, ApiError> {
            match self {
                Self::Message(message, user) => Ok(AuthResponse {
                    message: message.to_string(),
                    user,
                }),
                Self::Status(status) => Err(ApiError::Status {
                    status,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    /// Auth endpoint that answers from a script and records every call.
    struct ScriptedAuth {
        register: Reply,
        login: Reply,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedAuth {
        fn new(register: Reply, login: Reply) -> Self {
            Self {
                register,
                login,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AuthApi for ScriptedAuth {
        async fn register(&self, _: &Registration) -> Result<AuthResponse, ApiError> {
            self.calls.lock().unwrap().push("register");
            self.register.clone().into_result()
        }

        async fn login(&self, _: &Credentials) -> Result<AuthResponse, ApiError> {
            self.calls.lock().unwrap().push("login");
            self.login.clone().into_result()
        }
    }

    impl AuthApi for &ScriptedAuth {
        async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
            (**self).register(registration).await
        }

        async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
            (**self).login(credentials).await
        }
    }

    fn user_json() -> Value {
        json!({ "id": 1, "username": "testuser", "email": "test@mail.com", "role": "USER" })
    }

    fn logged_in() -> Reply {
        Reply::Message(LOGIN_SUCCESS, Some(user_json()))
    }

    fn registered() -> Reply {
        Reply::Message(REGISTER_SUCCESS, None)
    }

    fn credentials() -> Credentials {
        Credentials {
            email: Email::parse("test@mail.com").unwrap(),
            password: SecretString::from("Passw0rd!".to_string()),
        }
    }

    fn registration() -> Registration {
        Registration {
            email: Email::parse("test@mail.com").unwrap(),
            username: "testuser".to_string(),
            password: SecretString::from("Pa$w0rd".to_string()),
        }
    }

    fn orchestrator(api: &ScriptedAuth) -> (AuthOrchestrator<&ScriptedAuth>, Storage) {
        let storage = Storage::in_memory();
        let sessions = SessionManager::new(storage.clone());
        (AuthOrchestrator::new(api, sessions), storage)
    }

    // =========================================================================
    // Login
    // =========================================================================

    #[tokio::test]
    async fn test_login_success_stores_user() {
        let api = ScriptedAuth::new(registered(), logged_in());
        let (auth, storage) = orchestrator(&api);

        assert!(auth.login(&credentials()).await);

        let stored: Value = storage.get(keys::CURRENT_USER).unwrap();
        assert_eq!(stored, user_json());
        assert_eq!(
            auth.sessions().current_session().unwrap().id,
            UserId::new(1)
        );
    }

    #[tokio::test]
    async fn test_login_rejected_leaves_store_unchanged() {
        let api = ScriptedAuth::new(
            registered(),
            Reply::Message("Authentication failed", None),
        );
        let (auth, storage) = orchestrator(&api);

        let err = auth.authenticate(&credentials()).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected { ref message } if message == "Authentication failed"));
        assert!(err.is_rejection());
        assert_eq!(storage.get::<Value>(keys::CURRENT_USER), None);
    }

    #[tokio::test]
    async fn test_login_transport_error_is_false() {
        let api = ScriptedAuth::new(registered(), Reply::Status(503));
        let (auth, storage) = orchestrator(&api);

        assert!(!auth.login(&credentials()).await);
        assert_eq!(storage.get::<Value>(keys::CURRENT_USER), None);
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let api = ScriptedAuth::new(registered(), Reply::Status(500));
        let (auth, _) = orchestrator(&api);
        let existing = SessionIdentity {
            id: UserId::new(9),
            username: "earlier".to_string(),
            email: Email::parse("earlier@mail.com").unwrap(),
            role: Role::Admin,
        };
        auth.sessions().establish(&existing);

        assert!(!auth.login(&credentials()).await);
        assert_eq!(auth.sessions().current_session(), Some(existing));
    }

    #[tokio::test]
    async fn test_login_success_without_user_is_malformed() {
        let api = ScriptedAuth::new(registered(), Reply::Message(LOGIN_SUCCESS, None));
        let (auth, _) = orchestrator(&api);

        let err = auth.authenticate(&credentials()).await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedResponse(_)));
        assert!(!auth.sessions().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_with_unusable_user_is_malformed() {
        let api = ScriptedAuth::new(
            registered(),
            Reply::Message(LOGIN_SUCCESS, Some(json!({ "username": "no id" }))),
        );
        let (auth, _) = orchestrator(&api);

        assert!(matches!(
            auth.authenticate(&credentials()).await,
            Err(AuthError::MalformedResponse(_))
        ));
        assert!(!auth.sessions().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_drops_extra_user_fields() {
        let api = ScriptedAuth::new(
            registered(),
            Reply::Message(
                LOGIN_SUCCESS,
                Some(json!({
                    "id": 2,
                    "username": "bob",
                    "email": "bob@mail.com",
                    "password": "Secret1!"
                })),
            ),
        );
        let (auth, storage) = orchestrator(&api);

        assert!(auth.login(&credentials()).await);
        let stored: Value = storage.get(keys::CURRENT_USER).unwrap();
        assert_eq!(
            stored,
            json!({ "id": 2, "username": "bob", "email": "bob@mail.com", "role": "USER" })
        );
    }

    // =========================================================================
    // Registration
    // =========================================================================

    #[tokio::test]
    async fn test_register_then_login_success() {
        let api = ScriptedAuth::new(registered(), logged_in());
        let (auth, _) = orchestrator(&api);

        assert!(auth.register(&registration()).await);
        assert_eq!(api.calls(), vec!["register", "login"]);
        assert!(auth.sessions().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_success_but_login_failure_is_false() {
        let api = ScriptedAuth::new(
            registered(),
            Reply::Message("Authentication failed", None),
        );
        let (auth, _) = orchestrator(&api);

        assert!(!auth.register(&registration()).await);
        assert_eq!(api.calls(), vec!["register", "login"]);
        assert!(!auth.sessions().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_rejected_never_logs_in() {
        let api = ScriptedAuth::new(Reply::Message("Email already in use", None), logged_in());
        let (auth, _) = orchestrator(&api);

        let err = auth.register_and_login(&registration()).await.unwrap_err();
        assert!(matches!(err, AuthError::RegistrationRejected { .. }));
        assert_eq!(api.calls(), vec!["register"]);
        assert!(!auth.sessions().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_transport_error_never_logs_in() {
        let api = ScriptedAuth::new(Reply::Status(502), logged_in());
        let (auth, _) = orchestrator(&api);

        let err = auth.register_and_login(&registration()).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Transport {
                stage: Stage::Register,
                ..
            }
        ));
        assert_eq!(api.calls(), vec!["register"]);
    }

    // =========================================================================
    // Logout
    // =========================================================================

    #[tokio::test]
    async fn test_logout_ends_session() {
        let api = ScriptedAuth::new(registered(), logged_in());
        let (auth, _) = orchestrator(&api);

        assert!(auth.login(&credentials()).await);
        auth.logout();
        assert!(!auth.sessions().is_authenticated());

        auth.logout();
        assert!(!auth.sessions().is_authenticated());
    }
}
