//! User records.
//!
//! [`Identity`] is the full record kept by the user directory, password
//! included. [`SessionIdentity`] is the non-sensitive subset that represents
//! "who is using this client" and is the only shape ever written to the
//! session store.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{Email, Role, UserId};

/// A registered user as returned by the user directory.
///
/// The directory stores and transports the password in plaintext. It is kept
/// in a [`SecretString`] here so that it never shows up in `Debug` output or
/// logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    #[serde(with = "plaintext_secret")]
    pub password: SecretString,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    /// The session-safe subset of this identity.
    #[must_use]
    pub fn session(&self) -> SessionIdentity {
        SessionIdentity::from(self)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.username == other.username
            && self.email == other.email
            && self.password.expose_secret() == other.password.expose_secret()
            && self.role == other.role
    }
}

/// Session-stored user identity.
///
/// Exactly `{id, username, email, role}`. There is no password field, so a
/// password can never be persisted through this type. The auth endpoint may
/// omit `role`; it then defaults to [`Role::User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
}

impl From<&Identity> for SessionIdentity {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role,
        }
    }
}

/// The directory's wire format carries the password as a plain JSON string.
mod plaintext_secret {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(secret.expose_secret())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
        String::deserialize(deserializer).map(SecretString::from)
    }
}
