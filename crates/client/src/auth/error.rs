//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Which remote step of an auth flow failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Register,
    Login,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register => f.write_str("registration"),
            Self::Login => f.write_str("login"),
        }
    }
}

/// Errors that can occur during login or registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The auth endpoint answered but declined the login.
    #[error("login rejected: {message}")]
    Rejected { message: String },

    /// The auth endpoint answered but declined the registration.
    #[error("registration rejected: {message}")]
    RegistrationRejected { message: String },

    /// Login reported success but the user record was missing or malformed.
    #[error("malformed auth response: {0}")]
    MalformedResponse(String),

    /// The request never produced a usable answer.
    #[error("{stage} request failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: ApiError,
    },
}

impl AuthError {
    /// Whether the endpoint declined the request (as opposed to failing).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. } | Self::RegistrationRejected { .. }
        )
    }
}
