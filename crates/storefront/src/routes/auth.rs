//! Authentication route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::Result;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::user::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` - create an account and log in.
#[instrument(skip(state, session, body))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterBody>,
) -> Result<Json<CurrentUser>> {
    let auth = AuthService::new(state.pool());
    let profile = auth
        .register(&body.full_name, &body.email, &body.password)
        .await?;

    // Rotate the session id on privilege change.
    session.cycle_id().await?;

    let user = CurrentUser::from(&profile);
    set_current_user(&session, &user).await?;

    info!(user_id = %user.id, "account registered");

    Ok(Json(user))
}

/// `POST /auth/login` - log in with email and password.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<CurrentUser>> {
    let auth = AuthService::new(state.pool());
    let profile = auth.login(&body.email, &body.password).await?;

    session.cycle_id().await?;

    let user = CurrentUser::from(&profile);
    set_current_user(&session, &user).await?;

    Ok(Json(user))
}

/// `POST /auth/logout` - clear the logged-in user.
///
/// The cart is kept; only the login state is dropped.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    clear_current_user(&session).await?;
    Ok(Json(json!({ "ok": true })))
}

/// `GET /auth/me` - the current session user, or null.
#[instrument(skip(user))]
pub async fn me(OptionalUser(user): OptionalUser) -> Json<Option<CurrentUser>> {
    Json(user)
}
