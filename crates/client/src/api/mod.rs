//! REST clients for the three backend services.
//!
//! - [`UserDirectoryClient`] - registration, login and the user directory
//! - [`ProductClient`] - the product catalog (cached with `moka`)
//! - [`OrderClient`] - order intake
//!
//! All clients are cheap to clone and share one `reqwest::Client` each.

mod error;
pub mod orders;
pub mod products;
pub mod users;

pub use error::ApiError;
pub use orders::{OrderClient, OrderLine, OrderRequest};
pub use products::ProductClient;
pub use users::{AuthApi, AuthResponse, UserDirectoryClient};

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

/// `User-Agent` sent with every request.
const USER_AGENT: &str = concat!("shopfront/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the service clients.
///
/// # Errors
///
/// Returns `ApiError::Http` if the TLS backend cannot be initialised.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Append a path segment to a service base URL.
fn endpoint(base: &Url, segment: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}

/// Collection URL without a trailing slash.
fn collection(base: &Url) -> String {
    base.as_str().trim_end_matches('/').to_string()
}

/// Fail on non-2xx statuses, keeping the response body for diagnostics.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Check the status and decode a JSON body.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    check_status(response)
        .await?
        .json()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}
