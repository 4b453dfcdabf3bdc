//! Integration tests for Shopfront.
//!
//! The backend services are replaced by a `wiremock` server and the
//! key-value store lives in a temporary directory, so the tests need no
//! running infrastructure.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use shopfront_client::api::{self, OrderClient, ProductClient, UserDirectoryClient};
use shopfront_client::{
    AuthOrchestrator, CartStore, Checkout, EndpointConfig, ProfileService, SessionManager,
    Storage,
};
use shopfront_core::forms::{Credentials, Registration};
use shopfront_core::{Email, SessionIdentity};
use tempfile::TempDir;
use url::Url;
use wiremock::MockServer;

/// Auth endpoint path on the mock server.
pub const AUTH_PATH: &str = "/api/auth";
/// User directory path on the mock server.
pub const USERS_PATH: &str = "/api/users";
/// Product catalog path on the mock server.
pub const PRODUCTS_PATH: &str = "/api/products";
/// Order intake path on the mock server.
pub const ORDERS_PATH: &str = "/api/orders";

/// A mock backend plus a file-backed store in a temp directory.
pub struct TestContext {
    pub server: MockServer,
    pub storage: Storage,
    http: reqwest::Client,
    _dir: TempDir,
}

impl TestContext {
    /// Start the mock server and open a fresh store.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = Storage::open(Some(dir.path().join("store.json").as_path()));
        assert!(storage.is_persistent(), "temp store should be writable");

        Self {
            server,
            storage,
            http: api::http_client(Duration::from_secs(5)).expect("Failed to build HTTP client"),
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> Url {
        Url::parse(&format!("{}{path}", self.server.uri())).expect("Invalid mock server URL")
    }

    /// Endpoints pointing at the mock server.
    #[must_use]
    pub fn endpoints(&self) -> EndpointConfig {
        EndpointConfig {
            auth_url: self.url(AUTH_PATH),
            users_url: self.url(USERS_PATH),
            products_url: self.url(PRODUCTS_PATH),
            orders_url: self.url(ORDERS_PATH),
        }
    }

    #[must_use]
    pub fn sessions(&self) -> SessionManager {
        SessionManager::new(self.storage.clone())
    }

    #[must_use]
    pub fn users(&self) -> UserDirectoryClient {
        UserDirectoryClient::new(self.http.clone(), &self.endpoints())
    }

    #[must_use]
    pub fn auth(&self) -> AuthOrchestrator<UserDirectoryClient> {
        AuthOrchestrator::new(self.users(), self.sessions())
    }

    #[must_use]
    pub fn products(&self, ttl: Duration) -> ProductClient {
        ProductClient::new(self.http.clone(), self.url(PRODUCTS_PATH), ttl)
    }

    #[must_use]
    pub fn cart(&self) -> CartStore {
        CartStore::new(self.storage.clone())
    }

    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(
            self.cart(),
            self.sessions(),
            OrderClient::new(self.http.clone(), self.url(ORDERS_PATH)),
        )
    }

    #[must_use]
    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.users(), self.sessions())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Directory record for the standard test user.
#[must_use]
pub fn user_record() -> Value {
    json!({
        "id": 1,
        "username": "testuser",
        "email": "test@mail.com",
        "password": "Pa$w0rd",
        "role": "USER"
    })
}

/// Session fields of [`user_record`].
#[must_use]
pub fn user_session() -> SessionIdentity {
    SessionIdentity {
        id: 1.into(),
        username: "testuser".to_string(),
        email: email("test@mail.com"),
        role: shopfront_core::Role::User,
    }
}

/// Catalog entry as served by the product service.
#[must_use]
pub fn product_record(id: i32, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "category": { "id": 1, "name": "Home" },
        "stock": 5,
        "sku": format!("SKU-{id}"),
        "brand": "Acme",
        "createdAt": "2024-03-01T12:00:00Z",
        "imageUrl": format!("https://img.example/{id}.png")
    })
}

#[must_use]
pub fn email(address: &str) -> Email {
    Email::parse(address).expect("Invalid test email")
}

#[must_use]
pub fn credentials() -> Credentials {
    Credentials {
        email: email("test@mail.com"),
        password: SecretString::from("Pa$w0rd".to_string()),
    }
}

#[must_use]
pub fn registration() -> Registration {
    Registration {
        email: email("test@mail.com"),
        username: "testuser".to_string(),
        password: SecretString::from("Pa$w0rd".to_string()),
    }
}
