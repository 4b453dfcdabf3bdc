//! User directory and auth endpoint client.
//!
//! Registration and login go to the auth base URL; the directory operations
//! (list, update, delete) go to the users collection.

use std::future::Future;

use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use shopfront_core::forms::{Credentials, Registration};
use shopfront_core::{Identity, UserId};
use tracing::{debug, error, instrument};
use url::Url;

use super::{ApiError, check_status, collection, endpoint, read_json};
use crate::config::EndpointConfig;

/// Body returned by the auth endpoint.
///
/// Success is signalled only by `message`; `user` is present on a successful
/// login and its shape is not trusted until parsed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// The remote calls the auth orchestrator depends on.
pub trait AuthApi: Send + Sync {
    /// `POST /register`.
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    /// `POST /login`.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the user/auth service.
#[derive(Debug, Clone)]
pub struct UserDirectoryClient {
    client: Client,
    auth_url: Url,
    users_url: Url,
}

impl UserDirectoryClient {
    #[must_use]
    pub fn new(client: Client, endpoints: &EndpointConfig) -> Self {
        Self {
            client,
            auth_url: endpoints.auth_url.clone(),
            users_url: endpoints.users_url.clone(),
        }
    }

    /// Fetch every user in the directory.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a user list.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<Identity>, ApiError> {
        let response = self.client.get(collection(&self.users_url)).send().await?;
        let users: Vec<Identity> = read_json(response).await?;
        debug!(count = users.len(), "Fetched user directory");
        Ok(users)
    }

    /// Look a user up by id.
    ///
    /// The directory has no single-user endpoint, so this filters the full
    /// listing.
    ///
    /// # Errors
    ///
    /// Returns error if the listing cannot be fetched.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<Option<Identity>, ApiError> {
        Ok(self
            .list_users()
            .await?
            .into_iter()
            .find(|user| user.id == id))
    }

    /// Replace a user's record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the directory has no such user, or
    /// another error if the request fails.
    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub async fn update_user(&self, identity: &Identity) -> Result<(), ApiError> {
        let response = self
            .client
            .put(endpoint(&self.users_url, &identity.id.to_string()))
            .json(identity)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("user {}", identity.id)));
        }
        check_status(response).await.inspect_err(|e| {
            error!(error = %e, "Failed to update user");
        })?;

        debug!("User updated");
        Ok(())
    }

    /// Remove a user from the directory.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the directory has no such user, or
    /// another error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(endpoint(&self.users_url, &id.to_string()))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("user {id}")));
        }
        check_status(response).await?;

        debug!("User deleted");
        Ok(())
    }
}

impl AuthApi for UserDirectoryClient {
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let body = RegisterRequest {
            email: registration.email.as_str(),
            username: &registration.username,
            password: registration.password.expose_secret(),
        };

        let response = self
            .client
            .post(endpoint(&self.auth_url, "register"))
            .json(&body)
            .send()
            .await?;

        let result: AuthResponse = read_json(response).await?;
        debug!(message = %result.message, "Registration response");
        Ok(result)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            email: credentials.email.as_str(),
            password: credentials.password.expose_secret(),
        };

        let response = self
            .client
            .post(endpoint(&self.auth_url, "login"))
            .json(&body)
            .send()
            .await?;

        let result: AuthResponse = read_json(response).await?;
        debug!(
            message = %result.message,
            has_user = result.user.is_some(),
            "Login response"
        );
        Ok(result)
    }
}
