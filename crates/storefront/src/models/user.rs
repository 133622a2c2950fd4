//! Customer profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dona_onca_core::{Email, UserId};

/// A customer profile as stored in the `profiles` table.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    /// Authorizes the back-office panel.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The logged-in customer, as held in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub is_admin: bool,
}

impl From<&Profile> for CurrentUser {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            is_admin: profile.is_admin,
        }
    }
}
