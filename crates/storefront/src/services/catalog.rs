//! Cached catalog reads.
//!
//! The storefront listing pages are read-heavy and tolerate slightly
//! stale data, so active-product listings are cached for a short TTL.
//! Catalog edits land in the admin service, a separate process, so the
//! TTL is the staleness bound. Product detail and stock reads always go
//! to the database.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use dona_onca_core::{Product, ProductCategory, ProductId};

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;

/// How long a cached listing stays fresh.
const LISTING_TTL: Duration = Duration::from_secs(60);

/// Cache key for a listing, one entry per category filter.
fn listing_key(category: Option<ProductCategory>) -> String {
    category.map_or_else(|| "all".to_string(), |c| c.to_string())
}

/// Short-TTL cache over active-product listings.
#[derive(Clone)]
pub struct CatalogCache {
    listings: Cache<String, Arc<Vec<Product>>>,
}

impl CatalogCache {
    /// Create an empty catalog cache.
    #[must_use]
    pub fn new() -> Self {
        let listings = Cache::builder()
            .max_capacity(64)
            .time_to_live(LISTING_TTL)
            .build();

        Self { listings }
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog read service combining the repository with the listing cache.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    cache: &'a CatalogCache,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a CatalogCache) -> Self {
        Self {
            products: ProductRepository::new(pool),
            cache,
        }
    }

    /// List active products, optionally filtered by category.
    ///
    /// Served from the cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(
        &self,
        category: Option<ProductCategory>,
    ) -> Result<Arc<Vec<Product>>, RepositoryError> {
        let key = listing_key(category);

        if let Some(cached) = self.cache.listings.get(&key).await {
            return Ok(cached);
        }

        let products = Arc::new(self.products.list_active(category).await?);
        self.cache.listings.insert(key, Arc::clone(&products)).await;

        Ok(products)
    }

    /// Get a single product by id, uncached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.products.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_key_distinguishes_categories() {
        assert_eq!(listing_key(None), "all");
        assert_ne!(
            listing_key(Some(ProductCategory::Lingerie)),
            listing_key(Some(ProductCategory::Bodies))
        );
    }
}
