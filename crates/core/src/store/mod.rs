//! Store traits for catalog and order persistence.
//!
//! Both services talk to PostgreSQL through repositories implementing these
//! traits; tests substitute the in-memory [`memory::MemoryStore`]. The
//! traits carry the two correctness rules the original client-side code
//! lacked:
//!
//! - [`CatalogStore::sell`] is an atomic decrement with a floor: it fails
//!   on insufficient stock instead of clamping, so two concurrent sales of
//!   the last unit can never both succeed.
//! - [`OrderStore::claim_stock_deduction`] is a persisted idempotency
//!   guard: exactly one caller ever wins it for a given order.

pub mod memory;

pub use memory::MemoryStore;

use crate::order::{NewOrder, Order};
use crate::product::Product;
use crate::types::{OrderId, OrderStatus, ProductId};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The referenced product does not exist.
    #[error("produto {product_id} não encontrado")]
    ProductNotFound { product_id: ProductId },

    /// The referenced order does not exist.
    #[error("pedido {order_id} não encontrado")]
    OrderNotFound { order_id: OrderId },

    /// A sale would drive stock below zero.
    #[error(
        "estoque insuficiente para o produto {product_id}: pedido {requested}, disponível {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: i32,
    },

    /// The requested status change is not a valid lifecycle transition.
    #[error("transição de status inválida: {from} → {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The backing store failed.
    #[error("erro no armazenamento: {0}")]
    Backend(String),
}

/// Product catalog with atomic stock mutation.
pub trait CatalogStore: Send + Sync {
    /// Fetch a product by id.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, StoreError>> + Send;

    /// Atomically decrement stock, failing if fewer than `quantity` units
    /// remain. Returns the new stock level.
    ///
    /// This replaces the read-modify-write `max(0, stock - qty)` of the
    /// original client, which could silently oversell under concurrency.
    fn sell(
        &self,
        id: ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<i32, StoreError>> + Send;

    /// Atomically add `quantity` units back. Returns the new stock level.
    fn restock(
        &self,
        id: ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<i32, StoreError>> + Send;

    /// Decrement stock for every line, or for none: a single line with
    /// insufficient stock fails the whole batch with nothing deducted.
    fn sell_all(
        &self,
        lines: &[(ProductId, u32)],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Order persistence with the stock-deduction guard.
pub trait OrderStore: Send + Sync {
    /// Create an order. When `order.deduct_stock` is set, the creation and
    /// every line's stock decrement happen atomically: a single line with
    /// insufficient stock aborts the whole creation with nothing written.
    fn create(&self, order: NewOrder) -> impl Future<Output = Result<Order, StoreError>> + Send;

    /// Fetch an order by id.
    fn get(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, StoreError>> + Send;

    /// Transition an order's status, validating the lifecycle. Returns the
    /// updated order.
    fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> impl Future<Output = Result<Order, StoreError>> + Send;

    /// Claim the right to deduct stock for this order. Returns true for
    /// exactly one successful caller per order; false once claimed.
    fn claim_stock_deduction(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Hand back a claim whose deduction could not be performed, so a
    /// later retry can win it again.
    fn release_stock_deduction(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
