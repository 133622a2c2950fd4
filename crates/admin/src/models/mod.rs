//! Admin panel data models.

use serde::{Deserialize, Serialize};

use dona_onca_core::{Email, UserId};

use crate::db::team::TeamMember;

/// Session storage keys.
pub mod session_keys {
    /// The logged-in team member ([`super::CurrentAdmin`]).
    pub const CURRENT_ADMIN: &str = "current_admin";
}

/// The logged-in team member, as held in the session.
///
/// Only profiles with `is_admin` set ever reach the session; the flag is
/// re-checked at login, not on every request, so revoking access also
/// means the member's session should be allowed to lapse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
}

impl From<&TeamMember> for CurrentAdmin {
    fn from(member: &TeamMember) -> Self {
        Self {
            id: member.id,
            full_name: member.full_name.clone(),
            email: member.email.clone(),
        }
    }
}
