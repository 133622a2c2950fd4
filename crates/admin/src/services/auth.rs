//! Team authentication.
//!
//! Logs a profile into the back office. The flow mirrors the shop login
//! but adds the `is_admin` gate; a valid password on a non-admin account
//! still answers with the same generic rejection, so probing which
//! accounts are staff leaks nothing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sqlx::PgPool;
use thiserror::Error;

use dona_onca_core::Email;

use crate::db::RepositoryError;
use crate::db::team::{TeamMember, TeamRepository};

/// Errors from admin authentication.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] dona_onca_core::EmailError),

    /// Wrong email, wrong password, or not a team member.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    team: TeamRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            team: TeamRepository::new(pool),
        }
    }

    /// Login with email and password, requiring the `is_admin` flag.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` for a wrong password
    /// and, indistinguishably, for a correct password on a profile that
    /// is not a team member.
    pub async fn login(&self, email: &str, password: &str) -> Result<TeamMember, AdminAuthError> {
        let email = Email::parse(email)?;

        let (member, password_hash) = self
            .team
            .get_with_password_hash(&email)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !member.is_admin {
            return Err(AdminAuthError::InvalidCredentials);
        }

        Ok(member)
    }
}

/// Verify a password against a stored Argon2id hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AdminAuthError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AdminAuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

    fn hash(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[test]
    fn correct_password_verifies() {
        let stored = hash("senha-do-painel");
        assert!(verify_password("senha-do-painel", &stored).is_ok());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let stored = hash("senha-do-painel");
        assert!(matches!(
            verify_password("outra-senha", &stored),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        assert!(matches!(
            verify_password("qualquer", "not-a-phc-string"),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }
}
