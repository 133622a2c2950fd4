//! Product repository.
//!
//! The stock mutations here are the storefront's side of the shared
//! `products.stock` counter. Both are single conditional statements, so
//! concurrent shoppers can never drive stock negative: the decrement only
//! matches when enough units remain, and a non-matching decrement is an
//! explicit insufficient-stock failure rather than a silent clamp.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use dona_onca_core::product::Product;
use dona_onca_core::store::{CatalogStore, StoreError};
use dona_onca_core::{Price, ProductCategory, ProductId};

use super::RepositoryError;

/// Row shape of the `products` table.
#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub has_sizes: bool,
    pub sizes: Vec<String>,
    pub has_colors: bool,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    pub stock: i32,
    pub low_stock_alert: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: ProductCategory = row.category.parse().map_err(|e: String| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            category,
            price: Price::new(row.price),
            original_price: row.original_price.map(Price::new),
            has_sizes: row.has_sizes,
            sizes: row.sizes,
            has_colors: row.has_colors,
            colors: row.colors,
            images: row.images,
            stock: row.stock,
            low_stock_alert: row.low_stock_alert,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, description, category, price, \
     original_price, has_sizes, sizes, has_colors, colors, images, stock, \
     low_stock_alert, active, created_at, updated_at";

/// Repository for product reads and stock mutations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products, optionally filtered by category, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored category is not in the fixed set.
    #[instrument(skip(self))]
    pub async fn list_active(
        &self,
        category: Option<ProductCategory>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE active AND ($1::text IS NULL OR category = $1) \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(category.map(|c| c.to_string()))
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by id, whether or not it is active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Current stock level, for distinguishing not-found from sold-out.
    async fn stock_of(&self, id: ProductId) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await
    }
}

impl CatalogStore for ProductRepository<'_> {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.get(id).await?)
    }

    #[instrument(skip(self))]
    async fn sell(&self, id: ProductId, quantity: u32) -> Result<i32, StoreError> {
        let quantity = i32::try_from(quantity)
            .map_err(|_| StoreError::Backend("quantity out of range".to_string()))?;

        let new_stock = sqlx::query_scalar::<_, i32>(
            "UPDATE products SET stock = stock - $2, updated_at = now() \
             WHERE id = $1 AND stock >= $2 RETURNING stock",
        )
        .bind(id.as_i32())
        .bind(quantity)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match new_stock {
            Some(stock) => Ok(stock),
            None => match self
                .stock_of(id)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?
            {
                Some(available) => Err(StoreError::InsufficientStock {
                    product_id: id,
                    requested: quantity.unsigned_abs(),
                    available,
                }),
                None => Err(StoreError::ProductNotFound { product_id: id }),
            },
        }
    }

    #[instrument(skip(self))]
    async fn restock(&self, id: ProductId, quantity: u32) -> Result<i32, StoreError> {
        let quantity = i32::try_from(quantity)
            .map_err(|_| StoreError::Backend("quantity out of range".to_string()))?;

        sqlx::query_scalar::<_, i32>(
            "UPDATE products SET stock = stock + $2, updated_at = now() \
             WHERE id = $1 RETURNING stock",
        )
        .bind(id.as_i32())
        .bind(quantity)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?
        .ok_or(StoreError::ProductNotFound { product_id: id })
    }

    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    async fn sell_all(&self, lines: &[(ProductId, u32)]) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        for &(id, quantity) in lines {
            let quantity = i32::try_from(quantity)
                .map_err(|_| StoreError::Backend("quantity out of range".to_string()))?;

            let updated = sqlx::query_scalar::<_, i32>(
                "UPDATE products SET stock = stock - $2, updated_at = now() \
                 WHERE id = $1 AND stock >= $2 RETURNING stock",
            )
            .bind(id.as_i32())
            .bind(quantity)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

            if updated.is_some() {
                continue;
            }

            // An error drops the transaction, rolling back the lines
            // already deducted.
            let available =
                sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
                    .bind(id.as_i32())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;

            return Err(match available {
                Some(available) => StoreError::InsufficientStock {
                    product_id: id,
                    requested: quantity.unsigned_abs(),
                    available,
                },
                None => StoreError::ProductNotFound { product_id: id },
            });
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
