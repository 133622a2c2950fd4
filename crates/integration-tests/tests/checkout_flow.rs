//! End-to-end checkout over the in-memory store.
//!
//! Covers the reference purchase: two products in the cart, one of them
//! twice, checked out in a single atomic order.

#![allow(clippy::unwrap_used)]

use dona_onca_core::cart::AddItem;
use dona_onca_core::store::StoreError;
use dona_onca_core::{OrderStatus, Price, ProductId};
use dona_onca_core::store::MemoryStore;

use dona_onca_integration_tests::fixtures::{ShopSession, product, shipping_config};

use dona_onca_storefront::error::AppError;

#[tokio::test]
async fn two_line_purchase_deducts_exactly_and_clears_the_cart() {
    // R$ 50,00 shirt-equivalent and R$ 30,00, stock 5 and 3.
    let store = MemoryStore::with_products(vec![product(1, 5000, 5), product(2, 3000, 3)]);
    let config = shipping_config();

    let mut session = ShopSession::new(7);
    session.cart.add_item(AddItem::from_product(
        &product(1, 5000, 5),
        None,
        None,
        2,
    ));
    session.cart.add_item(AddItem::from_product(
        &product(2, 3000, 3),
        None,
        None,
        1,
    ));
    assert_eq!(session.cart.subtotal(), Price::from_centavos(13000));

    let order = session.checkout(&store, &config).await.unwrap();

    // R$ 130,00 subtotal plus flat-rate shipping.
    assert_eq!(order.subtotal, Price::from_centavos(13000));
    assert_eq!(order.shipping, Price::from_centavos(1990));
    assert_eq!(order.total, Price::from_centavos(14990));
    assert_eq!(order.status, OrderStatus::Pendente);
    assert!(order.stock_deducted_at.is_some());

    // Each line deducted exactly its quantity.
    assert_eq!(store.stock_of(ProductId::new(1)), Some(3));
    assert_eq!(store.stock_of(ProductId::new(2)), Some(2));

    // The session cart is empty and ready for the next purchase.
    assert!(session.cart.is_empty());
}

#[tokio::test]
async fn failed_checkout_keeps_the_cart_and_all_stock() {
    let store = MemoryStore::with_products(vec![product(1, 5000, 5), product(2, 4000, 0)]);
    let config = shipping_config();

    let mut session = ShopSession::new(7);
    session
        .cart
        .add_item(AddItem::from_product(&product(1, 5000, 5), None, None, 2));
    session
        .cart
        .add_item(AddItem::from_product(&product(2, 4000, 0), None, None, 1));

    let err = session.checkout(&store, &config).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Store(StoreError::InsufficientStock { .. })
    ));

    // Nothing was deducted for the line that did have stock.
    assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
    assert_eq!(store.stock_of(ProductId::new(2)), Some(0));

    // The shopper keeps the cart to fix it up.
    assert_eq!(session.cart.item_count(), 3);
    assert!(store.orders_snapshot().is_empty());
}

#[tokio::test]
async fn subtotal_above_threshold_ships_free() {
    let store = MemoryStore::with_products(vec![product(1, 30000, 2)]);
    let config = shipping_config();

    let mut session = ShopSession::new(7);
    session
        .cart
        .add_item(AddItem::from_product(&product(1, 30000, 2), None, None, 1));

    let order = session.checkout(&store, &config).await.unwrap();

    assert_eq!(order.shipping, Price::ZERO);
    assert_eq!(order.total, Price::from_centavos(30000));
}
