//! Team management handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use dona_onca_core::{Email, UserId};

use crate::db::team::{TeamMember, TeamRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// A profile as the team page shows it.
#[derive(Debug, Serialize)]
pub struct MemberView {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub is_admin: bool,
}

impl From<TeamMember> for MemberView {
    fn from(member: TeamMember) -> Self {
        Self {
            id: member.id,
            full_name: member.full_name,
            email: member.email,
            is_admin: member.is_admin,
        }
    }
}

/// `GET /api/team` - every profile, admins first.
#[instrument(skip(state, _admin))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberView>>> {
    let members = TeamRepository::new(state.pool()).list().await?;
    Ok(Json(members.into_iter().map(MemberView::from).collect()))
}

/// Body for grant and revoke.
#[derive(Debug, Deserialize)]
pub struct MemberBody {
    pub email: String,
}

/// `POST /api/team/grant` - grant back-office access to a profile.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.id))]
pub async fn grant(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<MemberBody>,
) -> Result<Json<MemberView>> {
    let member = set_admin(&state, &body.email, true).await?;
    info!(member_id = %member.id, "admin access granted");
    Ok(Json(member))
}

/// `POST /api/team/revoke` - revoke back-office access.
///
/// Revoking your own access is refused; another admin has to do it, so
/// the shop can never end up with zero admins by accident.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.id))]
pub async fn revoke(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<MemberBody>,
) -> Result<Json<MemberView>> {
    let email = Email::parse(&body.email)
        .map_err(|_| AppError::BadRequest("E-mail inválido.".to_string()))?;

    if email == admin.0.email {
        return Err(AppError::BadRequest(
            "Você não pode revogar o próprio acesso.".to_string(),
        ));
    }

    let member = set_admin(&state, &body.email, false).await?;
    info!(member_id = %member.id, "admin access revoked");
    Ok(Json(member))
}

async fn set_admin(state: &AppState, email: &str, is_admin: bool) -> Result<MemberView> {
    let email = Email::parse(email)
        .map_err(|_| AppError::BadRequest("E-mail inválido.".to_string()))?;

    let member = TeamRepository::new(state.pool())
        .set_admin(&email, is_admin)
        .await?
        .ok_or_else(|| AppError::NotFound("Perfil não encontrado.".to_string()))?;

    Ok(MemberView::from(member))
}
