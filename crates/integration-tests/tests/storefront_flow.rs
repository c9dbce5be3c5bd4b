//! End-to-end shopping flow: browse, cart, order, coupon.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use mercadito_client::ApiError;
use mercadito_client::api::{CartLine, OrderDetails};
use mercadito_client::models::cart_count;
use mercadito_integration_tests::{MOCK_COUPON, TestApi};

fn line_for(product: &mercadito_client::models::Product, qty: i32) -> CartLine {
    CartLine {
        product_id: product.id,
        qty,
        price: product.price,
        shipping_amount: product.shipping_amount,
        country: "PE".to_string(),
        size: "M".to_string(),
        color: "Natural".to_string(),
    }
}

fn details() -> OrderDetails {
    OrderDetails {
        full_name: "Ana Torres".to_string(),
        email: "ana@example.com".to_string(),
        mobile: "5551234".to_string(),
        address: "Av. Siempre Viva 742".to_string(),
        city: "Lima".to_string(),
        state: "Lima".to_string(),
        country: "PE".to_string(),
    }
}

#[tokio::test]
async fn catalog_reads_are_cached() {
    let api = TestApi::start().await;
    let client = api.client();

    let first = client.products().await.unwrap();
    let second = client.products().await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);

    // Second read served from the cache.
    assert_eq!(api.state.product_calls.load(std::sync::atomic::Ordering::SeqCst), 1);

    let product = client.product("alpaca-sweater").await.unwrap();
    let again = client.product("alpaca-sweater").await.unwrap();
    assert_eq!(product.id, again.id);
    assert_eq!(api.state.product_calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let api = TestApi::start().await;
    let client = api.client();

    let err = client.product("no-such-slug").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn cart_flow_recomputes_totals_server_side() {
    let api = TestApi::start().await;
    let client = api.client();
    let cart_id = client.session().cart_id();

    let product = client.product("alpaca-sweater").await.unwrap();
    client
        .cart_add(&cart_id, &line_for(&product, 2))
        .await
        .unwrap();

    let items = client.cart_list(&cart_id, None).await.unwrap();
    assert_eq!(cart_count(&items), 2);

    let summary = client.cart_summary(&cart_id, None).await.unwrap();
    assert_eq!(summary.sub_total, Decimal::new(11_980, 2)); // 2 x 59.90
    assert_eq!(summary.shipping, Decimal::new(1_000, 2)); // 2 x 5.00
    assert!(summary.total > summary.sub_total);

    // Same variant again: the server upserts the quantity, not a new line.
    client
        .cart_add(&cart_id, &line_for(&product, 3))
        .await
        .unwrap();
    let items = client.cart_list(&cart_id, None).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(cart_count(&items), 3);

    let item_id = items.first().unwrap().id;
    client.cart_remove(&cart_id, item_id, None).await.unwrap();
    let items = client.cart_list(&cart_id, None).await.unwrap();
    assert_eq!(cart_count(&items), 0);
}

#[tokio::test]
async fn checkout_with_coupon_discounts_the_order() {
    let api = TestApi::start().await;
    let client = api.client();
    let cart_id = client.session().cart_id();

    let product = client.product("alpaca-sweater").await.unwrap();
    client
        .cart_add(&cart_id, &line_for(&product, 1))
        .await
        .unwrap();

    let created = client.create_order(&cart_id, &details()).await.unwrap();
    let order = client.checkout(&created.order_oid).await.unwrap();
    assert_eq!(order.saved, Decimal::ZERO);
    let total_before = order.total;

    // Rejected code surfaces the server's message verbatim.
    let err = client
        .apply_coupon(&created.order_oid, "NOPE")
        .await
        .unwrap_err();
    match err {
        ApiError::Validation(message) => assert_eq!(message, "Coupon does not exist"),
        other => panic!("expected validation error, got {other}"),
    }

    let applied = client
        .apply_coupon(&created.order_oid, MOCK_COUPON)
        .await
        .unwrap();
    assert_eq!(applied.icon.as_deref(), Some("success"));

    let order = client.checkout(&created.order_oid).await.unwrap();
    assert!(order.saved > Decimal::ZERO);
    assert!(order.total < total_before);
}

#[tokio::test]
async fn anonymous_account_reads_fail_locally() {
    let api = TestApi::start().await;
    let client = api.client();

    let err = client.my_orders().await.unwrap_err();
    assert!(matches!(err, ApiError::LoginRequired));

    let err = client.vendor_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::LoginRequired));
}
