//! Database migration command.
//!
//! Both services share one database; the schema lives with the
//! storefront crate and this command applies it.

use super::{CommandError, connect};

/// Run the schema migrations from `crates/storefront/migrations/`.
///
/// The tower-sessions table is not part of these migrations; each
/// service creates it at startup via `PostgresStore::migrate`.
///
/// # Errors
///
/// Returns `CommandError` if `DATABASE_URL` is unset, the connection
/// fails, or a migration cannot be applied.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
