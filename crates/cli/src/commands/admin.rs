//! Back-office access management.

use dona_onca_admin::db::team::TeamRepository;
use dona_onca_core::Email;

use super::{CommandError, connect};

/// Set or clear the `is_admin` flag on the profile with this email.
///
/// The account must already exist; back-office access is granted to
/// registered shop accounts, never created from scratch here.
///
/// # Errors
///
/// Returns `CommandError::Invalid` for a malformed email or an unknown
/// account.
pub async fn set_admin(email: &str, is_admin: bool) -> Result<(), CommandError> {
    let email = Email::parse(email)
        .map_err(|e| CommandError::Invalid(format!("invalid email: {e}")))?;

    let pool = connect().await?;

    let member = TeamRepository::new(&pool)
        .set_admin(&email, is_admin)
        .await?
        .ok_or_else(|| {
            CommandError::Invalid(format!("no account registered with email {email}"))
        })?;

    if is_admin {
        tracing::info!(member_id = %member.id, %email, "admin access granted");
    } else {
        tracing::info!(member_id = %member.id, %email, "admin access revoked");
    }

    Ok(())
}
