//! Order repository for fulfillment.
//!
//! The admin side reads the whole order book and owns the lifecycle
//! transitions. `set_status` locks the row so the validity check and the
//! write are one step, and `claim_stock_deduction` is the persisted
//! once-only guard the fulfillment service races through before any
//! shipping deduction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use dona_onca_core::order::{NewOrder, Order, OrderItem, ShippingAddress};
use dona_onca_core::store::{OrderStore, StoreError};
use dona_onca_core::{OrderId, OrderStatus, PaymentMethod, Price, UserId};

use super::RepositoryError;

/// Row shape of the `orders` table.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: i32,
    items: Json<Vec<OrderItem>>,
    address: Json<ShippingAddress>,
    subtotal: Decimal,
    shipping: Decimal,
    total: Decimal,
    payment_method: String,
    status: String,
    stock_deducted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e: String| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;
        let payment_method: PaymentMethod = row.payment_method.parse().map_err(|e: String| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: OrderId::from_uuid(row.id),
            user_id: UserId::new(row.user_id),
            items: row.items.0,
            address: row.address.0,
            subtotal: Price::new(row.subtotal),
            shipping: Price::new(row.shipping),
            total: Price::new(row.total),
            payment_method,
            status,
            stock_deducted_at: row.stock_deducted_at,
            created_at: row.created_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, user_id, items, address, subtotal, shipping, \
     total, payment_method, status, stock_deducted_at, created_at";

/// Repository for the full order book.
pub struct AdminOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminOrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, optionally filtered by status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(status.map(|s| s.to_string()))
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Fetch an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn fetch(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Deduct one line's stock inside the creation transaction.
    async fn sell_line(
        tx: &mut Transaction<'_, Postgres>,
        item: &OrderItem,
    ) -> Result<(), StoreError> {
        let quantity = i32::try_from(item.quantity)
            .map_err(|_| StoreError::Backend("quantity out of range".to_string()))?;

        let updated = sqlx::query_scalar::<_, i32>(
            "UPDATE products SET stock = stock - $2, updated_at = now() \
             WHERE id = $1 AND stock >= $2 RETURNING stock",
        )
        .bind(item.product_id.as_i32())
        .bind(quantity)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        if updated.is_some() {
            return Ok(());
        }

        let available = sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
            .bind(item.product_id.as_i32())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match available {
            Some(available) => Err(StoreError::InsufficientStock {
                product_id: item.product_id,
                requested: item.quantity,
                available,
            }),
            None => Err(StoreError::ProductNotFound {
                product_id: item.product_id,
            }),
        }
    }
}

impl OrderStore for AdminOrderRepository<'_> {
    #[instrument(skip(self, order), fields(user_id = %order.user_id))]
    async fn create(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if order.deduct_stock {
            for item in &order.items {
                Self::sell_line(&mut tx, item).await?;
            }
        }

        let id = OrderId::generate();
        let stock_deducted_at = order.deduct_stock.then(Utc::now);
        let sql = format!(
            "INSERT INTO orders (id, user_id, items, address, subtotal, shipping, \
             total, payment_method, status, stock_deducted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id.as_uuid())
            .bind(order.user_id.as_i32())
            .bind(Json(&order.items))
            .bind(Json(&order.address))
            .bind(order.subtotal.amount())
            .bind(order.shipping.amount())
            .bind(order.total.amount())
            .bind(order.payment_method.to_string())
            .bind(OrderStatus::Pendente.to_string())
            .bind(stock_deducted_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Order::try_from(row)?)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.fetch(id).await?)
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        // Lock the row so the lifecycle check and the write are one step.
        let current = sqlx::query_scalar::<_, String>(
            "SELECT status FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?
        .ok_or(StoreError::OrderNotFound { order_id: id })?;

        let from: OrderStatus = current.parse().map_err(StoreError::Backend)?;
        if !from.can_transition_to(status) {
            return Err(StoreError::InvalidTransition { from, to: status });
        }

        let sql = format!(
            "UPDATE orders SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id.as_uuid())
            .bind(status.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Order::try_from(row)?)
    }

    #[instrument(skip(self))]
    async fn claim_stock_deduction(&self, id: OrderId) -> Result<bool, StoreError> {
        let claimed = sqlx::query_scalar::<_, Uuid>(
            "UPDATE orders SET stock_deducted_at = now() \
             WHERE id = $1 AND stock_deducted_at IS NULL RETURNING id",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        if claimed.is_some() {
            return Ok(true);
        }

        // Distinguish an already-claimed order from a missing one.
        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match exists {
            Some(_) => Ok(false),
            None => Err(StoreError::OrderNotFound { order_id: id }),
        }
    }

    #[instrument(skip(self))]
    async fn release_stock_deduction(&self, id: OrderId) -> Result<(), StoreError> {
        let released = sqlx::query_scalar::<_, Uuid>(
            "UPDATE orders SET stock_deducted_at = NULL WHERE id = $1 RETURNING id",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        released
            .map(|_| ())
            .ok_or(StoreError::OrderNotFound { order_id: id })
    }
}
