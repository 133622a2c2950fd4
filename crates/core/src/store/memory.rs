//! In-memory store for tests.
//!
//! One mutex guards products and orders together, so order creation with
//! stock deduction is atomic the same way the PostgreSQL transaction is:
//! either every line's stock comes off and the order exists, or nothing
//! changed.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;

use crate::order::{NewOrder, Order};
use crate::product::Product;
use crate::types::{OrderId, OrderStatus, ProductId};

use super::{CatalogStore, OrderStore, StoreError};

#[derive(Default)]
struct Inner {
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
}

/// In-memory catalog + order store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with products.
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for product in products {
                inner.products.insert(product.id, product);
            }
        }
        store
    }

    /// Insert or replace a product.
    pub fn insert_product(&self, product: Product) {
        self.lock().products.insert(product.id, product);
    }

    /// Current stock for a product, for assertions.
    #[must_use]
    pub fn stock_of(&self, id: ProductId) -> Option<i32> {
        self.lock().products.get(&id).map(|p| p.stock)
    }

    /// Snapshot of all orders, for assertions.
    #[must_use]
    pub fn orders_snapshot(&self) -> Vec<Order> {
        self.lock().orders.values().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn sell_locked(
        &mut self,
        id: ProductId,
        quantity: u32,
    ) -> Result<i32, StoreError> {
        let product = self
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound { product_id: id })?;

        let requested = i64::from(quantity);
        let available = i64::from(product.stock);
        if available < requested {
            return Err(StoreError::InsufficientStock {
                product_id: id,
                requested: quantity,
                available: product.stock,
            });
        }

        product.stock = i32::try_from(available - requested).map_err(|_| {
            StoreError::Backend("stock out of i32 range".to_string())
        })?;
        Ok(product.stock)
    }

    /// Validate every line before mutating anything, so a failing line
    /// leaves stock untouched (single-transaction semantics).
    fn sell_all_locked(&mut self, lines: &[(ProductId, u32)]) -> Result<(), StoreError> {
        for &(id, quantity) in lines {
            let product = self
                .products
                .get(&id)
                .ok_or(StoreError::ProductNotFound { product_id: id })?;
            if i64::from(product.stock) < i64::from(quantity) {
                return Err(StoreError::InsufficientStock {
                    product_id: id,
                    requested: quantity,
                    available: product.stock,
                });
            }
        }
        for &(id, quantity) in lines {
            self.sell_locked(id, quantity)?;
        }
        Ok(())
    }
}

impl CatalogStore for MemoryStore {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.lock().products.get(&id).cloned())
    }

    async fn sell(&self, id: ProductId, quantity: u32) -> Result<i32, StoreError> {
        self.lock().sell_locked(id, quantity)
    }

    async fn restock(&self, id: ProductId, quantity: u32) -> Result<i32, StoreError> {
        let mut inner = self.lock();
        let product = inner
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound { product_id: id })?;
        product.stock = product.stock.saturating_add_unsigned(quantity);
        Ok(product.stock)
    }

    async fn sell_all(&self, lines: &[(ProductId, u32)]) -> Result<(), StoreError> {
        self.lock().sell_all_locked(lines)
    }
}

impl OrderStore for MemoryStore {
    async fn create(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut inner = self.lock();

        if order.deduct_stock {
            let lines: Vec<(ProductId, u32)> = order
                .items
                .iter()
                .map(|item| (item.product_id, item.quantity))
                .collect();
            inner.sell_all_locked(&lines)?;
        }

        let record = Order {
            id: OrderId::generate(),
            user_id: order.user_id,
            items: order.items,
            address: order.address,
            subtotal: order.subtotal,
            shipping: order.shipping,
            total: order.total,
            payment_method: order.payment_method,
            status: OrderStatus::Pendente,
            stock_deducted_at: order.deduct_stock.then(Utc::now),
            created_at: Utc::now(),
        };
        inner.orders.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.lock().orders.get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut inner = self.lock();
        let order = inner
            .orders
            .get_mut(&id)
            .ok_or(StoreError::OrderNotFound { order_id: id })?;

        if !order.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                from: order.status,
                to: status,
            });
        }
        order.status = status;
        Ok(order.clone())
    }

    async fn claim_stock_deduction(&self, id: OrderId) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        let order = inner
            .orders
            .get_mut(&id)
            .ok_or(StoreError::OrderNotFound { order_id: id })?;

        if order.stock_deducted_at.is_some() {
            return Ok(false);
        }
        order.stock_deducted_at = Some(Utc::now());
        Ok(true)
    }

    async fn release_stock_deduction(&self, id: OrderId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let order = inner
            .orders
            .get_mut(&id)
            .ok_or(StoreError::OrderNotFound { order_id: id })?;
        order.stock_deducted_at = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::order::{OrderItem, ShippingAddress};
    use crate::types::{PaymentMethod, Price, ProductCategory, UserId};

    fn product(id: i32, stock: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Produto {id}"),
            description: String::new(),
            category: ProductCategory::Lingerie,
            price: Price::from_centavos(5000),
            original_price: None,
            has_sizes: false,
            sizes: Vec::new(),
            has_colors: false,
            colors: Vec::new(),
            images: Vec::new(),
            stock,
            low_stock_alert: 2,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            recipient: "Maria Silva".into(),
            street: "Rua das Flores".into(),
            number: "45".into(),
            complement: None,
            neighborhood: "Centro".into(),
            city: "Curitiba".into(),
            state: "PR".into(),
            cep: "80010-000".into(),
        }
    }

    fn new_order(items: Vec<OrderItem>, deduct_stock: bool) -> NewOrder {
        let subtotal: Price = items.iter().map(OrderItem::line_total).sum();
        NewOrder {
            user_id: UserId::new(1),
            items,
            address: address(),
            subtotal,
            shipping: Price::ZERO,
            total: subtotal,
            payment_method: PaymentMethod::Pix,
            deduct_stock,
        }
    }

    fn item(product_id: i32, quantity: u32) -> OrderItem {
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
    async fn sell_fails_instead_of_clamping() {
        let store = MemoryStore::with_products([product(1, 1)]);

        assert_eq!(store.sell(ProductId::new(1), 1).await.unwrap(), 0);
        let err = store.sell(ProductId::new(1), 1).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            }
        ));
        // Stock never went negative
        assert_eq!(store.stock_of(ProductId::new(1)), Some(0));
    }

    #[tokio::test]
    async fn restock_adds_units() {
        let store = MemoryStore::with_products([product(1, 2)]);
        assert_eq!(store.restock(ProductId::new(1), 3).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn failed_creation_deducts_nothing() {
        let store = MemoryStore::with_products([product(1, 5), product(2, 0)]);

        let err = store
            .create(new_order(vec![item(1, 2), item(2, 1)], true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InsufficientStock { .. }));

        // The passing line was not deducted either
        assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
        assert!(store.orders_snapshot().is_empty());
    }

    #[tokio::test]
    async fn creation_with_deduction_stamps_the_guard() {
        let store = MemoryStore::with_products([product(1, 5)]);
        let order = store
            .create(new_order(vec![item(1, 2)], true))
            .await
            .unwrap();

        assert_eq!(store.stock_of(ProductId::new(1)), Some(3));
        assert!(order.stock_deducted_at.is_some());
        assert!(!store.claim_stock_deduction(order.id).await.unwrap());
    }

    #[tokio::test]
    async fn sell_all_deducts_nothing_when_one_line_is_short() {
        let store = MemoryStore::with_products([product(1, 5), product(2, 0)]);

        let err = store
            .sell_all(&[(ProductId::new(1), 2), (ProductId::new(2), 1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            }
        ));

        assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
        assert_eq!(store.stock_of(ProductId::new(2)), Some(0));
    }

    #[tokio::test]
    async fn sell_all_deducts_every_line_together() {
        let store = MemoryStore::with_products([product(1, 5), product(2, 3)]);

        store
            .sell_all(&[(ProductId::new(1), 2), (ProductId::new(2), 3)])
            .await
            .unwrap();

        assert_eq!(store.stock_of(ProductId::new(1)), Some(3));
        assert_eq!(store.stock_of(ProductId::new(2)), Some(0));
    }

    #[tokio::test]
    async fn released_claim_can_be_won_again() {
        let store = MemoryStore::with_products([product(1, 5)]);
        let order = store
            .create(new_order(vec![item(1, 1)], false))
            .await
            .unwrap();

        assert!(store.claim_stock_deduction(order.id).await.unwrap());
        store.release_stock_deduction(order.id).await.unwrap();
        assert!(store.claim_stock_deduction(order.id).await.unwrap());
    }

    #[tokio::test]
    async fn claim_succeeds_exactly_once() {
        let store = MemoryStore::with_products([product(1, 5)]);
        let order = store
            .create(new_order(vec![item(1, 1)], false))
            .await
            .unwrap();

        assert!(store.claim_stock_deduction(order.id).await.unwrap());
        assert!(!store.claim_stock_deduction(order.id).await.unwrap());
    }

    #[tokio::test]
    async fn set_status_validates_lifecycle() {
        let store = MemoryStore::with_products([product(1, 5)]);
        let order = store
            .create(new_order(vec![item(1, 1)], true))
            .await
            .unwrap();

        let err = store
            .set_status(order.id, OrderStatus::Entregue)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTransition {
                from: OrderStatus::Pendente,
                to: OrderStatus::Entregue,
            }
        ));

        let updated = store.set_status(order.id, OrderStatus::Pago).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Pago);
    }
}
