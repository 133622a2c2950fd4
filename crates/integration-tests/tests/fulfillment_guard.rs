//! Cross-service stock accounting: checkout on the shop side, shipping
//! and cancellation on the admin side, one shared stock counter.

#![allow(clippy::unwrap_used)]

use dona_onca_core::cart::AddItem;
use dona_onca_core::order::{NewOrder, OrderItem};
use dona_onca_core::store::{CatalogStore, MemoryStore, OrderStore, StoreError};
use dona_onca_core::{OrderStatus, PaymentMethod, Price, ProductId, UserId};

use dona_onca_admin::error::AppError;
use dona_onca_admin::services::fulfillment::FulfillmentService;
use dona_onca_integration_tests::fixtures::{ShopSession, address, product, shipping_config};

#[tokio::test]
async fn checkout_then_shipping_deducts_exactly_once() {
    let store = MemoryStore::with_products(vec![product(1, 5000, 5)]);
    let config = shipping_config();

    let mut session = ShopSession::new(7);
    session
        .cart
        .add_item(AddItem::from_product(&product(1, 5000, 5), None, None, 2));
    let order = session.checkout(&store, &config).await.unwrap();

    // Checkout already deducted.
    assert_eq!(store.stock_of(ProductId::new(1)), Some(3));

    store.set_status(order.id, OrderStatus::Pago).await.unwrap();

    let fulfillment = FulfillmentService::new(&store, &store);
    let shipped = fulfillment.mark_shipped(order.id).await.unwrap();

    assert_eq!(shipped.status, OrderStatus::Enviado);
    // Shipping found the guard spent and deducted nothing further.
    assert_eq!(store.stock_of(ProductId::new(1)), Some(3));
}

#[tokio::test]
async fn walking_a_shipment_back_and_forth_deducts_once() {
    let store = MemoryStore::with_products(vec![product(1, 5000, 5)]);
    let config = shipping_config();

    let mut session = ShopSession::new(7);
    session
        .cart
        .add_item(AddItem::from_product(&product(1, 5000, 5), None, None, 1));
    let order = session.checkout(&store, &config).await.unwrap();
    store.set_status(order.id, OrderStatus::Pago).await.unwrap();

    let fulfillment = FulfillmentService::new(&store, &store);

    // Pago → Enviado → Pago → Enviado: an aborted shipment retried.
    fulfillment.mark_shipped(order.id).await.unwrap();
    fulfillment
        .transition(order.id, OrderStatus::Pago)
        .await
        .unwrap();
    fulfillment.mark_shipped(order.id).await.unwrap();

    assert_eq!(store.stock_of(ProductId::new(1)), Some(4));
}

fn manual_order(items: Vec<OrderItem>) -> NewOrder {
    let subtotal: Price = items.iter().map(OrderItem::line_total).sum();
    NewOrder {
        user_id: UserId::new(7),
        items,
        address: address(),
        subtotal,
        shipping: Price::from_centavos(1990),
        total: subtotal + Price::from_centavos(1990),
        payment_method: PaymentMethod::Pix,
        deduct_stock: false,
    }
}

fn line(product_id: i32, quantity: u32) -> OrderItem {
    OrderItem {
        product_id: ProductId::new(product_id),
        name: format!("Produto {product_id}"),
        size: "Único".into(),
        color: "Único".into(),
        quantity,
        unit_price: Price::from_centavos(5000),
    }
}

#[tokio::test]
async fn partially_stocked_shipment_fails_whole_and_stays_retryable() {
    // A manual order over two products, one of them sold out.
    let store = MemoryStore::with_products(vec![product(1, 5000, 5), product(2, 5000, 0)]);
    let order = store
        .create(manual_order(vec![line(1, 1), line(2, 1)]))
        .await
        .unwrap();
    store.set_status(order.id, OrderStatus::Pago).await.unwrap();

    let fulfillment = FulfillmentService::new(&store, &store);
    let err = fulfillment.mark_shipped(order.id).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Store(StoreError::InsufficientStock { .. })
    ));

    // The stocked line was not deducted, the order did not ship, and a
    // cancellation now has nothing to restock.
    assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
    let stalled = store.get(order.id).await.unwrap().unwrap();
    assert_eq!(stalled.status, OrderStatus::Pago);
    assert!(stalled.stock_deducted_at.is_none());

    // Restock the missing product; the retry deducts both lines once.
    store.restock(ProductId::new(2), 4).await.unwrap();
    let shipped = fulfillment.mark_shipped(order.id).await.unwrap();
    assert_eq!(shipped.status, OrderStatus::Enviado);
    assert_eq!(store.stock_of(ProductId::new(1)), Some(4));
    assert_eq!(store.stock_of(ProductId::new(2)), Some(3));

    // Cancelling the shipped order puts exactly those units back.
    fulfillment.cancel(order.id).await.unwrap();
    assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
    assert_eq!(store.stock_of(ProductId::new(2)), Some(4));
}

#[tokio::test]
async fn cancelling_after_checkout_returns_the_units() {
    let store = MemoryStore::with_products(vec![product(1, 5000, 5)]);
    let config = shipping_config();

    let mut session = ShopSession::new(7);
    session
        .cart
        .add_item(AddItem::from_product(&product(1, 5000, 5), None, None, 3));
    let order = session.checkout(&store, &config).await.unwrap();
    assert_eq!(store.stock_of(ProductId::new(1)), Some(2));

    let fulfillment = FulfillmentService::new(&store, &store);
    let cancelled = fulfillment.cancel(order.id).await.unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelado);
    assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
}

#[tokio::test]
async fn delivery_completes_the_lifecycle_without_stock_changes() {
    let store = MemoryStore::with_products(vec![product(1, 5000, 5)]);
    let config = shipping_config();

    let mut session = ShopSession::new(7);
    session
        .cart
        .add_item(AddItem::from_product(&product(1, 5000, 5), None, None, 1));
    let order = session.checkout(&store, &config).await.unwrap();
    store.set_status(order.id, OrderStatus::Pago).await.unwrap();

    let fulfillment = FulfillmentService::new(&store, &store);
    fulfillment.mark_shipped(order.id).await.unwrap();
    let delivered = fulfillment
        .transition(order.id, OrderStatus::Entregue)
        .await
        .unwrap();

    assert_eq!(delivered.status, OrderStatus::Entregue);
    assert_eq!(store.stock_of(ProductId::new(1)), Some(4));

    // Delivered orders are out of reach for cancellation.
    assert!(fulfillment.cancel(order.id).await.is_err());
}
