//! Saved-address repository for customer accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use dona_onca_core::{AddressId, UserId};

use super::RepositoryError;

/// A saved shipping address.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserAddress {
    pub id: i32,
    pub user_id: i32,
    pub recipient: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub cep: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating an address.
#[derive(Debug, Clone)]
pub struct AddressInput {
    pub recipient: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub cep: String,
    pub is_default: bool,
}

const ADDRESS_COLUMNS: &str = "id, user_id, recipient, street, number, complement, \
     neighborhood, city, state, cep, is_default, created_at, updated_at";

/// Repository for the `user_addresses` table.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's saved addresses, default first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: UserId) -> Result<Vec<UserAddress>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM user_addresses \
             WHERE user_id = $1 ORDER BY is_default DESC, created_at DESC"
        );
        Ok(sqlx::query_as::<_, UserAddress>(&sql)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?)
    }

    /// Create a new address. Setting the default clears any previous one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        user_id: UserId,
        input: AddressInput,
    ) -> Result<UserAddress, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if input.is_default {
            sqlx::query("UPDATE user_addresses SET is_default = false WHERE user_id = $1")
                .bind(user_id.as_i32())
                .execute(&mut *tx)
                .await?;
        }

        let sql = format!(
            "INSERT INTO user_addresses (user_id, recipient, street, number, complement, \
             neighborhood, city, state, cep, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {ADDRESS_COLUMNS}"
        );
        let address = sqlx::query_as::<_, UserAddress>(&sql)
            .bind(user_id.as_i32())
            .bind(&input.recipient)
            .bind(&input.street)
            .bind(&input.number)
            .bind(&input.complement)
            .bind(&input.neighborhood)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.cep)
            .bind(input.is_default)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(address)
    }

    /// Update an address owned by the user. Returns None when the address
    /// does not exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        user_id: UserId,
        id: AddressId,
        input: AddressInput,
    ) -> Result<Option<UserAddress>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if input.is_default {
            sqlx::query("UPDATE user_addresses SET is_default = false WHERE user_id = $1")
                .bind(user_id.as_i32())
                .execute(&mut *tx)
                .await?;
        }

        let sql = format!(
            "UPDATE user_addresses SET recipient = $3, street = $4, number = $5, \
             complement = $6, neighborhood = $7, city = $8, state = $9, cep = $10, \
             is_default = $11, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {ADDRESS_COLUMNS}"
        );
        let address = sqlx::query_as::<_, UserAddress>(&sql)
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .bind(&input.recipient)
            .bind(&input.street)
            .bind(&input.number)
            .bind(&input.complement)
            .bind(&input.neighborhood)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.cep)
            .bind(input.is_default)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(address)
    }

    /// Delete an address owned by the user. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: UserId, id: AddressId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM user_addresses WHERE id = $1 AND user_id = $2")
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
