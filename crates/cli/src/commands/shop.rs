//! Catalog, cart and order commands.
//!
//! # Usage
//!
//! ```bash
//! shopfront products
//! shopfront cart add 3 -q 2
//! shopfront cart show
//! shopfront order
//! ```

use std::error::Error;

use shopfront_core::ProductId;

use super::{App, say};
use crate::telemetry;

/// List the catalog.
pub async fn products(app: &App) -> Result<(), Box<dyn Error>> {
    let products = app.products().list_products().await?;
    if products.is_empty() {
        say("No products")?;
        return Ok(());
    }

    for product in products.iter() {
        let availability = if product.in_stock() {
            format!("{} in stock", product.stock)
        } else {
            "out of stock".to_string()
        };
        say(format_args!(
            "{:>4}  {:<32} {:>10}  {} / {}  ({availability})",
            product.id, product.name, product.price, product.brand, product.category.name
        ))?;
    }
    Ok(())
}

/// Print the cart and its total.
pub fn show_cart(app: &App) -> Result<(), Box<dyn Error>> {
    let cart = app.cart();
    let items = cart.items();
    if items.is_empty() {
        say("Your cart is empty")?;
        return Ok(());
    }

    for item in &items {
        say(format_args!(
            "{:>4}  {:<32} {:>3} x {:>10} = {:>10}",
            item.product_id,
            item.name,
            item.quantity,
            item.price,
            item.subtotal()
        ))?;
    }
    say(format_args!("Total: {}", cart.total()))?;
    Ok(())
}

/// Add a product from the catalog to the cart.
pub async fn add_to_cart(app: &App, id: ProductId, quantity: u32) -> Result<(), Box<dyn Error>> {
    let product = app.products().get_product(id).await?;
    app.cart().add(&product, quantity);

    let (id_text, quantity_text) = (id.to_string(), quantity.to_string());
    telemetry::add_breadcrumb(
        "cart",
        "Added to cart",
        &[
            ("product_id", id_text.as_str()),
            ("quantity", quantity_text.as_str()),
        ],
    );
    say(format_args!("Added {quantity} x {} to cart", product.name))?;
    Ok(())
}

/// Change the quantity of a cart line; zero removes it.
pub fn set_quantity(app: &App, id: ProductId, quantity: u32) -> Result<(), Box<dyn Error>> {
    app.cart().set_quantity(id, quantity);
    show_cart(app)
}

/// Remove a product from the cart.
pub fn remove_from_cart(app: &App, id: ProductId) -> Result<(), Box<dyn Error>> {
    app.cart().remove(id);
    show_cart(app)
}

/// Empty the cart.
pub fn clear_cart(app: &App) -> Result<(), Box<dyn Error>> {
    app.cart().clear();
    say("Cart cleared")?;
    Ok(())
}

/// Place an order for the cart contents.
pub async fn place_order(app: &App) -> Result<(), Box<dyn Error>> {
    let ack = app.checkout().place_order().await?;
    telemetry::add_breadcrumb("order", "Order placed", &[]);
    say("Order placed successfully!")?;
    say(ack)?;
    Ok(())
}
