//! Product listing cache, cart and checkout against mocked services.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use serde_json::json;
use shopfront_client::CheckoutError;
use shopfront_client::api::ApiError;
use shopfront_core::{Price, ProductId};
use shopfront_integration_tests::{TestContext, product_record, user_session};
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_json, method, path},
};

async fn mount_catalog(ctx: &TestContext, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_record(1, "Desk Lamp", 19.99),
            product_record(2, "Bulb", 0.1),
        ])))
        .expect(expected_calls)
        .mount(&ctx.server)
        .await;
}

#[tokio::test]
async fn test_list_products_parses_catalog() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx, 1).await;

    let products = ctx.products(Duration::from_secs(60)).list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Desk Lamp");
    assert_eq!(products[0].price, Price::from_cents(1999));
    assert_eq!(products[0].category.name, "Home");
    assert!(products[1].in_stock());
}

#[tokio::test]
async fn test_listing_is_cached_until_invalidated() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx, 2).await;

    let client = ctx.products(Duration::from_secs(60));
    client.list_products().await.unwrap();
    client.list_products().await.unwrap();
    // A clone shares the cache.
    client.clone().list_products().await.unwrap();

    client.invalidate().await;
    client.list_products().await.unwrap();

    ctx.server.verify().await;
}

#[tokio::test]
async fn test_get_product_unknown_id() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx, 1).await;

    let client = ctx.products(Duration::from_secs(60));
    assert_eq!(
        client.get_product(ProductId::new(2)).await.unwrap().name,
        "Bulb"
    );
    assert!(matches!(
        client.get_product(ProductId::new(99)).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_catalog_server_error() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .products(Duration::from_secs(60))
        .list_products()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, ref message } if message == "maintenance"));
}

#[tokio::test]
async fn test_order_posts_cart_and_clears_it() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_json(json!({
            "userId": 1,
            "products": [
                { "productId": 1, "quantity": 2 },
                { "productId": 2, "quantity": 3 }
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "orderId": 77 })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let products = ctx.products(Duration::from_secs(60)).list_products().await.unwrap();
    let cart = ctx.cart();
    cart.add(&products[0], 1);
    cart.add(&products[1], 3);
    cart.add(&products[0], 1);
    assert_eq!(cart.total(), Price::from_cents(4028));

    ctx.sessions().establish(&user_session());

    let ack = ctx.checkout().place_order().await.unwrap();
    assert_eq!(ack["orderId"], 77);
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_order_accepted_without_body_clears_cart() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let products = ctx.products(Duration::from_secs(60)).list_products().await.unwrap();
    ctx.cart().add(&products[0], 1);
    ctx.sessions().establish(&user_session());

    let ack = ctx.checkout().place_order().await.unwrap();
    assert_eq!(ack, serde_json::Value::Null);
    assert!(ctx.cart().is_empty());
}

#[tokio::test]
async fn test_order_accepted_with_text_body_clears_cart() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Order received"))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let products = ctx.products(Duration::from_secs(60)).list_products().await.unwrap();
    ctx.cart().add(&products[1], 2);
    ctx.sessions().establish(&user_session());

    assert!(ctx.checkout().place_order().await.is_ok());
    assert!(ctx.cart().is_empty());
}

#[tokio::test]
async fn test_failed_order_keeps_cart() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_string("out of stock"))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let products = ctx.products(Duration::from_secs(60)).list_products().await.unwrap();
    ctx.cart().add(&products[0], 1);
    ctx.sessions().establish(&user_session());

    let err = ctx.checkout().place_order().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Order(ApiError::Status { status: 500, .. })));
    assert_eq!(ctx.cart().items().len(), 1);
}

#[tokio::test]
async fn test_order_requires_login() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let products = ctx.products(Duration::from_secs(60)).list_products().await.unwrap();
    ctx.cart().add(&products[1], 1);

    assert!(matches!(
        ctx.checkout().place_order().await,
        Err(CheckoutError::NotAuthenticated)
    ));
    assert!(!ctx.cart().is_empty());
}
