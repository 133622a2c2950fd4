//! Order fulfillment.
//!
//! The lifecycle itself is validated by the store's `set_status`; this
//! service owns the stock side effects around two transitions:
//!
//! - Enviado deducts the order's lines at most once, all lines together
//!   or none, behind the persisted `claim_stock_deduction` guard. An
//!   order created through checkout arrives with the guard already spent,
//!   so shipping it never deducts again, and walking a shipped order back
//!   to Pago and shipping it a second time deducts nothing either. A
//!   failed batch hands the claim back so the shipment can be retried.
//! - Cancelado puts a deducted order's units back on the shelf.

use tracing::{info, instrument, warn};

use dona_onca_core::store::{CatalogStore, OrderStore, StoreError};
use dona_onca_core::{OrderId, OrderStatus, ProductId};
use dona_onca_core::order::Order;

use crate::error::{AppError, Result};

/// Drives order status changes and their stock side effects.
pub struct FulfillmentService<'a, C, O> {
    catalog: &'a C,
    orders: &'a O,
}

impl<'a, C: CatalogStore, O: OrderStore> FulfillmentService<'a, C, O> {
    /// Create a new fulfillment service.
    pub const fn new(catalog: &'a C, orders: &'a O) -> Self {
        Self { catalog, orders }
    }

    /// Transition an order, routing through the stock-aware paths.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` for an unknown order, an invalid
    /// lifecycle transition, or insufficient stock when shipping.
    pub async fn transition(&self, id: OrderId, to: OrderStatus) -> Result<Order> {
        match to {
            OrderStatus::Enviado => self.mark_shipped(id).await,
            OrderStatus::Cancelado => self.cancel(id).await,
            other => Ok(self.orders.set_status(id, other).await?),
        }
    }

    /// Ship an order, deducting stock exactly once per order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the order does not exist, the current
    /// status cannot move to Enviado, or a line is out of stock.
    #[instrument(skip(self))]
    pub async fn mark_shipped(&self, id: OrderId) -> Result<Order> {
        let order = self
            .orders
            .get(id)
            .await?
            .ok_or(StoreError::OrderNotFound { order_id: id })?;

        // Reject an impossible transition before touching the guard, so
        // shipping a cancelled order does not burn its claim.
        if !order.status.can_transition_to(OrderStatus::Enviado) {
            return Err(AppError::Store(StoreError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Enviado,
            }));
        }

        if self.orders.claim_stock_deduction(id).await? {
            let lines: Vec<(ProductId, u32)> = order
                .items
                .iter()
                .map(|item| (item.product_id, item.quantity))
                .collect();

            // The batch deducts every line or none. When it fails, hand
            // the claim back so a retry after restocking can still win it.
            if let Err(err) = self.catalog.sell_all(&lines).await {
                self.orders.release_stock_deduction(id).await?;
                return Err(err.into());
            }
            info!(order_id = %id, lines = order.items.len(), "stock deducted for shipment");
        }

        Ok(self.orders.set_status(id, OrderStatus::Enviado).await?)
    }

    /// Cancel an order, restocking its lines when they were deducted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the order does not exist or its
    /// status does not allow cancellation.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<Order> {
        let order = self
            .orders
            .get(id)
            .await?
            .ok_or(StoreError::OrderNotFound { order_id: id })?;

        if !order.status.is_cancellable() {
            return Err(AppError::Store(StoreError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelado,
            }));
        }

        let cancelled = self.orders.set_status(id, OrderStatus::Cancelado).await?;

        if order.stock_deducted_at.is_some() {
            for item in &order.items {
                // A deleted product has nothing to restock.
                match self.catalog.restock(item.product_id, item.quantity).await {
                    Ok(_) | Err(StoreError::ProductNotFound { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            info!(order_id = %id, lines = order.items.len(), "stock returned on cancellation");
        } else {
            warn!(order_id = %id, "cancelled order had no stock deduction to return");
        }

        Ok(cancelled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dona_onca_core::order::{NewOrder, OrderItem, ShippingAddress};
    use dona_onca_core::product::Product;
    use dona_onca_core::store::MemoryStore;
    use dona_onca_core::{PaymentMethod, Price, ProductCategory, ProductId, UserId};

    fn product(id: i32, stock: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Produto {id}"),
            description: String::new(),
            category: ProductCategory::Lingerie,
            price: Price::from_centavos(10000),
            original_price: None,
            has_sizes: false,
            sizes: vec![],
            has_colors: false,
            colors: vec![],
            images: vec![],
            stock,
            low_stock_alert: 2,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            recipient: "Ana Souza".to_string(),
            street: "Rua das Flores".to_string(),
            number: "10".to_string(),
            complement: None,
            neighborhood: "Centro".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            cep: "01001-000".to_string(),
        }
    }

    fn order_item(product_id: i32, quantity: u32) -> OrderItem {
        OrderItem {
            product_id: ProductId::new(product_id),
            name: format!("Produto {product_id}"),
            size: "Único".to_string(),
            color: "Único".to_string(),
            quantity,
            unit_price: Price::from_centavos(10000),
        }
    }

    fn new_order_with_items(items: Vec<OrderItem>, deduct_stock: bool) -> NewOrder {
        let subtotal: Price = items.iter().map(OrderItem::line_total).sum();
        NewOrder {
            user_id: UserId::new(7),
            items,
            address: address(),
            subtotal,
            shipping: Price::from_centavos(1990),
            total: subtotal + Price::from_centavos(1990),
            payment_method: PaymentMethod::Pix,
            deduct_stock,
        }
    }

    fn new_order(quantity: u32, deduct_stock: bool) -> NewOrder {
        new_order_with_items(vec![order_item(1, quantity)], deduct_stock)
    }

    #[tokio::test]
    async fn shipping_a_manual_order_deducts_stock_once() {
        let store = MemoryStore::with_products(vec![product(1, 5)]);
        let order = store.create(new_order(2, false)).await.unwrap();
        assert_eq!(store.stock_of(ProductId::new(1)), Some(5));

        let service = FulfillmentService::new(&store, &store);
        store
            .set_status(order.id, OrderStatus::Pago)
            .await
            .unwrap();
        let shipped = service.mark_shipped(order.id).await.unwrap();

        assert_eq!(shipped.status, OrderStatus::Enviado);
        assert_eq!(store.stock_of(ProductId::new(1)), Some(3));
    }

    #[tokio::test]
    async fn toggling_shipped_status_never_deducts_twice() {
        let store = MemoryStore::with_products(vec![product(1, 5)]);
        let order = store.create(new_order(2, false)).await.unwrap();
        store
            .set_status(order.id, OrderStatus::Pago)
            .await
            .unwrap();

        let service = FulfillmentService::new(&store, &store);
        service.mark_shipped(order.id).await.unwrap();
        store
            .set_status(order.id, OrderStatus::Pago)
            .await
            .unwrap();
        service.mark_shipped(order.id).await.unwrap();

        assert_eq!(store.stock_of(ProductId::new(1)), Some(3));
    }

    #[tokio::test]
    async fn shipping_a_checkout_order_deducts_nothing_further() {
        let store = MemoryStore::with_products(vec![product(1, 5)]);
        let order = store.create(new_order(2, true)).await.unwrap();
        assert_eq!(store.stock_of(ProductId::new(1)), Some(3));
        store
            .set_status(order.id, OrderStatus::Pago)
            .await
            .unwrap();

        let service = FulfillmentService::new(&store, &store);
        service.mark_shipped(order.id).await.unwrap();

        assert_eq!(store.stock_of(ProductId::new(1)), Some(3));
    }

    #[tokio::test]
    async fn failed_multi_line_shipment_deducts_nothing_and_keeps_the_claim() {
        let store = MemoryStore::with_products(vec![product(1, 5), product(2, 0)]);
        let order = store
            .create(new_order_with_items(
                vec![order_item(1, 1), order_item(2, 1)],
                false,
            ))
            .await
            .unwrap();
        store
            .set_status(order.id, OrderStatus::Pago)
            .await
            .unwrap();

        let service = FulfillmentService::new(&store, &store);
        let err = service.mark_shipped(order.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::InsufficientStock { .. })
        ));

        // The in-stock line was not deducted and the order did not ship.
        assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
        let unshipped = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(unshipped.status, OrderStatus::Pago);
        assert!(unshipped.stock_deducted_at.is_none());

        // After restocking, the retry deducts every line exactly once.
        store.restock(ProductId::new(2), 3).await.unwrap();
        let shipped = service.mark_shipped(order.id).await.unwrap();
        assert_eq!(shipped.status, OrderStatus::Enviado);
        assert_eq!(store.stock_of(ProductId::new(1)), Some(4));
        assert_eq!(store.stock_of(ProductId::new(2)), Some(2));
    }

    #[tokio::test]
    async fn cancelling_a_deducted_order_restocks() {
        let store = MemoryStore::with_products(vec![product(1, 5)]);
        let order = store.create(new_order(2, true)).await.unwrap();
        assert_eq!(store.stock_of(ProductId::new(1)), Some(3));

        let service = FulfillmentService::new(&store, &store);
        let cancelled = service.cancel(order.id).await.unwrap();

        assert_eq!(cancelled.status, OrderStatus::Cancelado);
        assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
    }

    #[tokio::test]
    async fn cancelling_an_undeducted_order_leaves_stock_alone() {
        let store = MemoryStore::with_products(vec![product(1, 5)]);
        let order = store.create(new_order(2, false)).await.unwrap();

        let service = FulfillmentService::new(&store, &store);
        service.cancel(order.id).await.unwrap();

        assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
    }

    #[tokio::test]
    async fn delivered_orders_cannot_be_cancelled() {
        let store = MemoryStore::with_products(vec![product(1, 5)]);
        let order = store.create(new_order(1, true)).await.unwrap();
        store
            .set_status(order.id, OrderStatus::Pago)
            .await
            .unwrap();
        store
            .set_status(order.id, OrderStatus::Enviado)
            .await
            .unwrap();
        store
            .set_status(order.id, OrderStatus::Entregue)
            .await
            .unwrap();

        let service = FulfillmentService::new(&store, &store);
        let err = service.cancel(order.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn shipping_a_pending_order_is_rejected_without_burning_the_claim() {
        let store = MemoryStore::with_products(vec![product(1, 5)]);
        let order = store.create(new_order(1, false)).await.unwrap();

        let service = FulfillmentService::new(&store, &store);
        let err = service.mark_shipped(order.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::InvalidTransition { .. })
        ));

        // The claim is still available for a later legitimate shipment.
        store
            .set_status(order.id, OrderStatus::Pago)
            .await
            .unwrap();
        service.mark_shipped(order.id).await.unwrap();
        assert_eq!(store.stock_of(ProductId::new(1)), Some(4));
    }
}
