//! Command implementations.
//!
//! Every command receives an [`App`], which wires the client library
//! together from one [`ShopfrontConfig`].

pub mod account;
pub mod shop;
pub mod users;

use std::io::{self, BufRead, IsTerminal, Write};

use shopfront_client::api::{self, OrderClient, ProductClient, UserDirectoryClient};
use shopfront_client::{
    AuthOrchestrator, CartStore, Checkout, ProfileService, SessionManager, ShopfrontConfig,
    Storage,
};

/// Shared state for one CLI invocation.
#[derive(Debug, Clone)]
pub struct App {
    config: ShopfrontConfig,
    storage: Storage,
    http: reqwest::Client,
}

impl App {
    /// Open the store and build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ShopfrontConfig) -> Result<Self, api::ApiError> {
        let storage = Storage::open(config.store_path.as_deref());
        let http = api::http_client(config.http_timeout)?;

        if !storage.is_persistent() {
            tracing::warn!("Store is not persistent; state will be lost on exit");
        }

        Ok(Self {
            config,
            storage,
            http,
        })
    }

    #[must_use]
    pub fn sessions(&self) -> SessionManager {
        SessionManager::new(self.storage.clone())
    }

    #[must_use]
    pub fn users(&self) -> UserDirectoryClient {
        UserDirectoryClient::new(self.http.clone(), &self.config.endpoints)
    }

    #[must_use]
    pub fn auth(&self) -> AuthOrchestrator<UserDirectoryClient> {
        AuthOrchestrator::new(self.users(), self.sessions())
    }

    #[must_use]
    pub fn products(&self) -> ProductClient {
        ProductClient::new(
            self.http.clone(),
            self.config.endpoints.products_url.clone(),
            self.config.product_cache_ttl,
        )
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
            OrderClient::new(self.http.clone(), self.config.endpoints.orders_url.clone()),
        )
    }

    #[must_use]
    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.users(), self.sessions())
    }
}

/// Write one line of command output to stdout.
fn say(line: impl std::fmt::Display) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{line}")
}

/// Use `value` when given, otherwise read one line from stdin.
///
/// The prompt goes to stderr and only when stdin is a terminal, so input can
/// be piped (`printf '%s\n' "$PW" | shopfront login -e ...`).
///
/// # Errors
///
/// Returns error if stdin cannot be read.
pub fn secret_or_stdin(value: Option<String>, prompt: &str) -> io::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{prompt}: ")?;
        stderr.flush()?;
    }

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
