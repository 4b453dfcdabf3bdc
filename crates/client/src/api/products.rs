//! Product catalog client.
//!
//! The catalog is read-only from this side. Listings are cached with `moka`
//! for the configured TTL so repeated browsing within one process does not
//! refetch.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use shopfront_core::{Product, ProductId};
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, collection, read_json};

/// Cache key for the full listing.
const LISTING_KEY: &str = "products";

/// Client for the product catalog service.
#[derive(Clone)]
pub struct ProductClient {
    inner: Arc<ProductClientInner>,
}

struct ProductClientInner {
    client: reqwest::Client,
    url: Url,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl std::fmt::Debug for ProductClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductClient")
            .field("url", &self.inner.url.as_str())
            .finish_non_exhaustive()
    }
}

impl ProductClient {
    /// Create a client whose listings stay cached for `ttl`.
    #[must_use]
    pub fn new(client: reqwest::Client, url: Url, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();

        Self {
            inner: Arc::new(ProductClientInner { client, url, cache }),
        }
    }

    /// Fetch the product listing, serving it from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(products) = self.inner.cache.get(&LISTING_KEY).await {
            debug!(count = products.len(), "Cache hit for product listing");
            return Ok(products);
        }

        let response = self
            .inner
            .client
            .get(collection(&self.inner.url))
            .send()
            .await?;
        let products: Arc<Vec<Product>> = Arc::new(read_json(response).await?);

        debug!(count = products.len(), "Fetched product listing");
        self.inner
            .cache
            .insert(LISTING_KEY, Arc::clone(&products))
            .await;

        Ok(products)
    }

    /// Find a single product in the listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no product has this id, or any error
    /// from [`Self::list_products`].
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.list_products()
            .await?
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("product {id}")))
    }

    /// Drop every cached listing.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
