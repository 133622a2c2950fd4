//! Team repository over the shared `profiles` table.
//!
//! Every shop customer lives in `profiles`; a team member is simply a
//! profile with `is_admin` set. Granting access is flipping the flag on
//! an existing account, never creating one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use dona_onca_core::{Email, UserId};

use super::RepositoryError;

/// A profile as the team page sees it.
#[derive(Debug, Clone)]
pub struct TeamMember {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Row shape of the `profiles` table, without the password hash.
#[derive(sqlx::FromRow)]
struct MemberRow {
    id: i32,
    full_name: String,
    email: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for TeamMember {
    type Error = RepositoryError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            full_name: row.full_name,
            email,
            is_admin: row.is_admin,
            created_at: row.created_at,
        })
    }
}

const MEMBER_COLUMNS: &str = "id, full_name, email, is_admin, created_at";

/// Repository for team management and admin login.
pub struct TeamRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TeamRepository<'a> {
    /// Create a new team repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every profile, admins first, then by signup date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<TeamMember>, RepositoryError> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM profiles \
             ORDER BY is_admin DESC, created_at ASC"
        );
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TeamMember::try_from).collect()
    }

    /// Get a profile by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: UserId) -> Result<Option<TeamMember>, RepositoryError> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM profiles WHERE id = $1");
        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(TeamMember::try_from).transpose()
    }

    /// Get a profile together with its password hash, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(TeamMember, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct WithHash {
            id: i32,
            full_name: String,
            email: String,
            is_admin: bool,
            password_hash: String,
            created_at: DateTime<Utc>,
        }

        let row = sqlx::query_as::<_, WithHash>(
            "SELECT id, full_name, email, is_admin, password_hash, created_at \
             FROM profiles WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let hash = r.password_hash.clone();
                let member = TeamMember::try_from(MemberRow {
                    id: r.id,
                    full_name: r.full_name,
                    email: r.email,
                    is_admin: r.is_admin,
                    created_at: r.created_at,
                })?;
                Ok(Some((member, hash)))
            }
            None => Ok(None),
        }
    }

    /// Set or clear the admin flag. Returns the updated profile, or
    /// `None` when no profile has that email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, email))]
    pub async fn set_admin(
        &self,
        email: &Email,
        is_admin: bool,
    ) -> Result<Option<TeamMember>, RepositoryError> {
        let sql = format!(
            "UPDATE profiles SET is_admin = $2, updated_at = now() \
             WHERE email = $1 RETURNING {MEMBER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(email.as_str())
            .bind(is_admin)
            .fetch_optional(self.pool)
            .await?;

        row.map(TeamMember::try_from).transpose()
    }
}
