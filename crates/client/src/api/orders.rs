//! Order intake client.

use serde::Serialize;
use shopfront_core::{ProductId, UserId};
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::{ApiError, check_status, collection};
use crate::cart::CartItem;

/// One product line of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

/// Payload of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: UserId,
    pub products: Vec<OrderLine>,
}

impl OrderRequest {
    #[must_use]
    pub fn new(user_id: UserId, items: &[CartItem]) -> Self {
        Self {
            user_id,
            products: items.iter().map(OrderLine::from).collect(),
        }
    }
}

/// Client for the order service.
#[derive(Debug, Clone)]
pub struct OrderClient {
    client: reqwest::Client,
    url: Url,
}

impl OrderClient {
    #[must_use]
    pub const fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Submit an order for `user_id` containing `items`.
    ///
    /// Any 2xx status means the order was accepted. The acknowledgment body is
    /// returned as-is when it is JSON; an empty or non-JSON body becomes
    /// `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the service rejects the order.
    #[instrument(skip(self, items), fields(user_id = %user_id, lines = items.len()))]
    pub async fn create_order(
        &self,
        user_id: UserId,
        items: &[CartItem],
    ) -> Result<serde_json::Value, ApiError> {
        let request = OrderRequest::new(user_id, items);

        let response = self
            .client
            .post(collection(&self.url))
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await.inspect_err(|e| {
            error!(error = %e, "Order creation failed");
        })?;

        // The order is placed at this point; the body is informational.
        let body = response.text().await.unwrap_or_else(|e| {
            warn!(error = %e, "Could not read order acknowledgment");
            String::new()
        });

        debug!("Order created");
        Ok(parse_ack(&body))
    }
}

/// Decode an acknowledgment body, tolerating empty and non-JSON bodies.
fn parse_ack(body: &str) -> serde_json::Value {
    if body.trim().is_empty() {
        return serde_json::Value::Null;
    }

    serde_json::from_str(body).unwrap_or_else(|e| {
        warn!(error = %e, "Order acknowledgment is not JSON");
        serde_json::Value::Null
    })
}
