//! Database operations for the admin panel.
//!
//! The admin service runs against the same database as the storefront;
//! there is no separate schema. These repositories cover the write-heavy
//! back-office side of the shared tables:
//!
//! - `products` - full catalog CRUD plus restock
//! - `orders` - fulfillment queries and lifecycle transitions
//! - `profiles` - team listing and the `is_admin` flag
//! - `site_settings` - banners, About page, shipping configuration
//!
//! Queries use the runtime sqlx API with `FromRow` row structs converted
//! into the core domain types; a stored value the domain rejects surfaces
//! as `RepositoryError::DataCorruption`.

pub mod orders;
pub mod products;
pub mod settings;
pub mod team;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use dona_onca_core::store::StoreError;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique constraint violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Row exists but holds a value the domain rejects.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<RepositoryError> for StoreError {
    fn from(err: RepositoryError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
