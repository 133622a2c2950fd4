//! Catalog repository for the back office.
//!
//! Unlike the storefront's read path, the admin sees every product,
//! active or not, and owns the mutations: create, edit, activate,
//! restock, delete. Stock decrements stay conditional so a fulfillment
//! racing a checkout can never drive the counter negative.

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
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    category: String,
    price: Decimal,
    original_price: Option<Decimal>,
    has_sizes: bool,
    sizes: Vec<String>,
    has_colors: bool,
    colors: Vec<String>,
    images: Vec<String>,
    stock: i32,
    low_stock_alert: i32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
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

const PRODUCT_COLUMNS: &str = "id, name, description, category, price, \
     original_price, has_sizes, sizes, has_colors, colors, images, stock, \
     low_stock_alert, active, created_at, updated_at";

/// Writable product fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub price: Price,
    pub original_price: Option<Price>,
    pub has_sizes: bool,
    pub sizes: Vec<String>,
    pub has_colors: bool,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    pub stock: i32,
    pub low_stock_alert: i32,
    pub active: bool,
}

/// Repository for catalog management.
pub struct AdminProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, active and inactive, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored category is not in the fixed set.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// List active products whose stock is at or below their alert level.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE active AND stock <= low_stock_alert ORDER BY stock ASC"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by id.
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

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products (name, description, category, price, original_price, \
             has_sizes, sizes, has_colors, colors, images, stock, low_stock_alert, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = Self::bind_input(sqlx::query_as::<_, ProductRow>(&sql), input)
            .fetch_one(self.pool)
            .await?;

        Product::try_from(row)
    }

    /// Replace every writable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "UPDATE products SET name = $1, description = $2, category = $3, price = $4, \
             original_price = $5, has_sizes = $6, sizes = $7, has_colors = $8, colors = $9, \
             images = $10, stock = $11, low_stock_alert = $12, active = $13, \
             updated_at = now() WHERE id = $14 RETURNING {PRODUCT_COLUMNS}"
        );
        let row = Self::bind_input(sqlx::query_as::<_, ProductRow>(&sql), input)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Activate or deactivate a product without touching anything else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self))]
    pub async fn set_active(
        &self,
        id: ProductId,
        active: bool,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "UPDATE products SET active = $2, updated_at = now() \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id.as_i32())
            .bind(active)
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Delete a product. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn bind_input<'q>(
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, ProductRow, sqlx::postgres::PgArguments>,
        input: &'q ProductInput,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, ProductRow, sqlx::postgres::PgArguments> {
        query
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.category.to_string())
            .bind(input.price.amount())
            .bind(input.original_price.map(|p| p.amount()))
            .bind(input.has_sizes)
            .bind(&input.sizes)
            .bind(input.has_colors)
            .bind(&input.colors)
            .bind(&input.images)
            .bind(input.stock)
            .bind(input.low_stock_alert)
            .bind(input.active)
    }

    /// Current stock level, for distinguishing not-found from sold-out.
    async fn stock_of(&self, id: ProductId) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await
    }
}

impl CatalogStore for AdminProductRepository<'_> {
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
