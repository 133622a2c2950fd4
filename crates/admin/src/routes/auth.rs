//! Team authentication handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::AdminAuthService;
use crate::state::AppState;

/// Body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` - log into the back office.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<CurrentAdmin>> {
    let auth = AdminAuthService::new(state.pool());
    let member = auth.login(&body.email, &body.password).await?;

    // Rotate the session id on privilege change.
    session.cycle_id().await?;

    let admin = CurrentAdmin::from(&member);
    set_current_admin(&session, &admin).await?;
    set_sentry_user(admin.id.as_i32(), Some(admin.email.as_str()));

    info!(admin_id = %admin.id, "team member logged in");

    Ok(Json(admin))
}

/// `POST /auth/logout` - clear the admin session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(Json(json!({ "ok": true })))
}

/// `GET /auth/me` - the current session admin.
#[instrument(skip(admin))]
pub async fn me(RequireAdmin(admin): RequireAdmin) -> Json<CurrentAdmin> {
    Json(admin)
}
