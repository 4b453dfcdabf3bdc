//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOPFRONT_AUTH_URL` - Auth endpoint base (default: `http://localhost:8080/api/auth`)
//! - `SHOPFRONT_USERS_URL` - User directory (default: `http://localhost:8080/api/users`)
//! - `SHOPFRONT_PRODUCTS_URL` - Product catalog (default: `http://localhost:8082/api/products`)
//! - `SHOPFRONT_ORDERS_URL` - Order intake (default: `http://localhost:8084/api/orders`)
//! - `SHOPFRONT_STORE_PATH` - Key-value store file (default: `<data dir>/shopfront/store.json`)
//! - `SHOPFRONT_HTTP_TIMEOUT_SECS` - Request timeout (default: 10)
//! - `SHOPFRONT_PRODUCT_CACHE_TTL_SECS` - Product listing cache TTL (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_AUTH_URL: &str = "http://localhost:8080/api/auth";
const DEFAULT_USERS_URL: &str = "http://localhost:8080/api/users";
const DEFAULT_PRODUCTS_URL: &str = "http://localhost:8082/api/products";
const DEFAULT_ORDERS_URL: &str = "http://localhost:8084/api/orders";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "10";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Base URLs of the three backend services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Auth endpoint base; `/register` and `/login` are appended.
    pub auth_url: Url,
    /// User directory collection URL.
    pub users_url: Url,
    /// Product catalog collection URL.
    pub products_url: Url,
    /// Order intake collection URL.
    pub orders_url: Url,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            auth_url: default_url(DEFAULT_AUTH_URL),
            users_url: default_url(DEFAULT_USERS_URL),
            products_url: default_url(DEFAULT_PRODUCTS_URL),
            orders_url: default_url(DEFAULT_ORDERS_URL),
        }
    }
}

/// Shopfront client configuration.
#[derive(Debug, Clone)]
pub struct ShopfrontConfig {
    /// Backend service URLs
    pub endpoints: EndpointConfig,
    /// Key-value store file; `None` means in-memory only
    pub store_path: Option<PathBuf>,
    /// Timeout applied to every HTTP request
    pub http_timeout: Duration,
    /// How long a product listing is served from cache
    pub product_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for ShopfrontConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            store_path: default_store_path(),
            http_timeout: Duration::from_secs(10),
            product_cache_ttl: Duration::from_secs(300),
            sentry_dsn: None,
        }
    }
}

impl ShopfrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let endpoints = EndpointConfig {
            auth_url: get_url("SHOPFRONT_AUTH_URL", DEFAULT_AUTH_URL)?,
            users_url: get_url("SHOPFRONT_USERS_URL", DEFAULT_USERS_URL)?,
            products_url: get_url("SHOPFRONT_PRODUCTS_URL", DEFAULT_PRODUCTS_URL)?,
            orders_url: get_url("SHOPFRONT_ORDERS_URL", DEFAULT_ORDERS_URL)?,
        };

        let store_path = get_optional_env("SHOPFRONT_STORE_PATH")
            .map(PathBuf::from)
            .or_else(default_store_path);

        let http_timeout = get_seconds("SHOPFRONT_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let product_cache_ttl = get_seconds(
            "SHOPFRONT_PRODUCT_CACHE_TTL_SECS",
            DEFAULT_PRODUCT_CACHE_TTL_SECS,
        )?;

        Ok(Self {
            endpoints,
            store_path,
            http_timeout,
            product_cache_ttl,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Default store location under the platform data directory.
fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("shopfront").join("store.json"))
}

fn default_url(value: &str) -> Url {
    // Defaults are compile-time constants covered by tests.
    Url::parse(value).unwrap_or_else(|_| unreachable!("invalid default URL {value}"))
}

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn get_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    parse_url(key, &get_env_or_default(key, default))
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn get_seconds(key: &str, default: &str) -> Result<Duration, ConfigError> {
    parse_seconds(key, &get_env_or_default(key, default))
}

fn parse_seconds(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
