//! Profile repository for customer accounts.
//!
//! The `profiles` table carries both shop customers and back-office staff;
//! the `is_admin` flag is what authorizes the admin panel.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use dona_onca_core::{Email, UserId};

use super::{RepositoryError, is_unique_violation};
use crate::models::user::Profile;

/// Row shape of the `profiles` table, without the password hash.
#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i32,
    full_name: String,
    email: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = RepositoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            full_name: row.full_name,
            email,
            is_admin: row.is_admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PROFILE_COLUMNS: &str = "id, full_name, email, is_admin, created_at, updated_at";

/// Repository for profile database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Profile::try_from).transpose()
    }

    /// Get a profile by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, email))]
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Profile>, RepositoryError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1");
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(Profile::try_from).transpose()
    }

    /// Get a profile together with its password hash, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Profile, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct WithHash {
            id: i32,
            full_name: String,
            email: String,
            is_admin: bool,
            password_hash: String,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        let row = sqlx::query_as::<_, WithHash>(
            "SELECT id, full_name, email, is_admin, password_hash, created_at, updated_at \
             FROM profiles WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let hash = r.password_hash.clone();
                let profile = Profile::try_from(ProfileRow {
                    id: r.id,
                    full_name: r.full_name,
                    email: r.email,
                    is_admin: r.is_admin,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                })?;
                Ok(Some((profile, hash)))
            }
            None => Ok(None),
        }
    }

    /// Create a new profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, email, password_hash))]
    pub async fn create(
        &self,
        full_name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Profile, RepositoryError> {
        let sql = format!(
            "INSERT INTO profiles (full_name, email, password_hash) \
             VALUES ($1, $2, $3) RETURNING {PROFILE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(full_name)
            .bind(email.as_str())
            .bind(password_hash)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepositoryError::Conflict(format!("email {email} already registered"))
                } else {
                    RepositoryError::Database(e)
                }
            })?;

        Profile::try_from(row)
    }
}
