//! Site content handlers.
//!
//! The admin edits here; the storefront reads the same `site_settings`
//! rows, so a save is live on the shop's next request.

use axum::{Json, extract::State};
use serde_json::json;
use tracing::{info, instrument};

use dona_onca_core::Price;
use dona_onca_core::cart::ShippingConfig;

use crate::db::settings::{ABOUT_KEY, AboutContent, BANNERS_KEY, Banner, SettingsRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// `GET /api/content/banners` - home carousel banners.
#[instrument(skip(state, _admin))]
pub async fn banners(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Banner>>> {
    let banners = SettingsRepository::new(state.pool())
        .get::<Vec<Banner>>(BANNERS_KEY)
        .await?
        .unwrap_or_default();

    Ok(Json(banners))
}

/// `PUT /api/content/banners` - replace the home carousel.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.id))]
pub async fn put_banners(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<Vec<Banner>>,
) -> Result<Json<serde_json::Value>> {
    SettingsRepository::new(state.pool())
        .put(BANNERS_KEY, &body)
        .await?;

    info!(count = body.len(), "banners replaced");

    Ok(Json(json!({ "ok": true })))
}

/// `GET /api/content/about` - about page content.
#[instrument(skip(state, _admin))]
pub async fn about(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<AboutContent>> {
    let about = SettingsRepository::new(state.pool())
        .get::<AboutContent>(ABOUT_KEY)
        .await?
        .unwrap_or_default();

    Ok(Json(about))
}

/// `PUT /api/content/about` - replace the about page.
#[instrument(skip(state, _admin, body))]
pub async fn put_about(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<AboutContent>,
) -> Result<Json<serde_json::Value>> {
    SettingsRepository::new(state.pool())
        .put(ABOUT_KEY, &body)
        .await?;

    Ok(Json(json!({ "ok": true })))
}

/// `GET /api/content/shipping` - full shipping config, sender included.
#[instrument(skip(state, _admin))]
pub async fn shipping(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<ShippingConfig>> {
    let config = SettingsRepository::new(state.pool()).shipping_config().await?;
    Ok(Json(config))
}

/// `PUT /api/content/shipping` - replace the shipping config.
///
/// Saved server-side so checkout totals and shipping labels read the
/// same configuration on every workstation.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.id))]
pub async fn put_shipping(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ShippingConfig>,
) -> Result<Json<serde_json::Value>> {
    if body.flat_rate < Price::ZERO || body.free_above < Price::ZERO {
        return Err(AppError::BadRequest(
            "Os valores de frete não podem ser negativos.".to_string(),
        ));
    }

    SettingsRepository::new(state.pool())
        .put(crate::db::settings::SHIPPING_KEY, &body)
        .await?;

    info!("shipping config replaced");

    Ok(Json(json!({ "ok": true })))
}
