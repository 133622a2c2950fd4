//! Database operations for the storefront.
//!
//! # Tables
//!
//! - `products` - Catalog with stock counters
//! - `orders` - Frozen order records (JSONB items + address snapshot)
//! - `profiles` - Customer accounts with the `is_admin` flag
//! - `user_addresses` - Saved shipping addresses
//! - `site_settings` - Key/JSONB rows (shipping config, banners, about)
//! - `session` - tower-sessions storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p dona-onca-cli -- migrate
//! ```
//!
//! Queries use the runtime sqlx API with `FromRow` row structs that are
//! converted into the core domain types; a value the database hands back
//! that the domain rejects is surfaced as `RepositoryError::DataCorruption`.

pub mod addresses;
pub mod orders;
pub mod products;
pub mod settings;
pub mod users;

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

    /// Unique constraint violation (e.g. duplicate email).
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

/// Whether a sqlx error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
