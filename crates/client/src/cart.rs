//! Shopping cart kept in the key-value store, and order checkout.

use serde::{Deserialize, Serialize};
use shopfront_core::{Price, Product, ProductId};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, OrderClient};
use crate::session::SessionManager;
use crate::storage::{Storage, keys};

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Cart persisted under the `cart` key.
///
/// Like the session, nothing is cached: each call reads the stored list.
#[derive(Debug, Clone)]
pub struct CartStore {
    storage: Storage,
}

impl CartStore {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Current cart lines; an absent or unreadable cart is empty.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.storage.get(keys::CART).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Add `quantity` of `product`, merging with an existing line.
    pub fn add(&self, product: &Product, quantity: u32) -> Vec<CartItem> {
        let mut items = self.items();
        if quantity == 0 {
            return items;
        }

        match items.iter_mut().find(|item| item.product_id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                quantity,
            }),
        }

        debug!(product_id = %product.id, quantity, "Added to cart");
        self.save(&items);
        items
    }

    /// Set the quantity of a line; zero removes it.
    pub fn set_quantity(&self, product_id: ProductId, quantity: u32) -> Vec<CartItem> {
        if quantity == 0 {
            return self.remove(product_id);
        }

        let mut items = self.items();
        if let Some(item) = items.iter_mut().find(|item| item.product_id == product_id) {
            item.quantity = quantity;
            self.save(&items);
        }
        items
    }

    /// Drop the line for `product_id`, if present.
    pub fn remove(&self, product_id: ProductId) -> Vec<CartItem> {
        let mut items = self.items();
        items.retain(|item| item.product_id != product_id);
        self.save(&items);
        items
    }

    /// Sum of every line's subtotal.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items().iter().map(CartItem::subtotal).sum()
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.storage.remove(keys::CART);
    }

    fn save(&self, items: &[CartItem]) {
        self.storage.set(keys::CART, items);
    }
}

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("log in to place an order")]
    NotAuthenticated,

    #[error("order failed: {0}")]
    Order(#[from] ApiError),
}

/// Turns the cart into an order for the logged-in user.
#[derive(Debug, Clone)]
pub struct Checkout {
    cart: CartStore,
    sessions: SessionManager,
    orders: OrderClient,
}

impl Checkout {
    #[must_use]
    pub const fn new(cart: CartStore, sessions: SessionManager, orders: OrderClient) -> Self {
        Self {
            cart,
            sessions,
            orders,
        }
    }

    /// Submit the cart. The cart is cleared only once the order is accepted.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::EmptyCart` if there is nothing to order
    /// - `CheckoutError::NotAuthenticated` if no one is logged in
    /// - `CheckoutError::Order` if the order service fails; the cart is kept
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> Result<serde_json::Value, CheckoutError> {
        let items = self.cart.items();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let session = self
            .sessions
            .current_session()
            .ok_or(CheckoutError::NotAuthenticated)?;

        let ack = self
            .orders
            .create_order(session.id, &items)
            .await
            .inspect_err(|e| warn!(error = %e, "Order not placed, keeping cart"))?;

        self.cart.clear();
        info!(user_id = %session.id, lines = items.len(), "Order placed");
        Ok(ack)
    }
}
