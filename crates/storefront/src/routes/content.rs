//! Public site content handlers: banners, about page, shipping pricing.
//!
//! All of this is admin-edited content in `site_settings`; the
//! storefront only reads it.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use dona_onca_core::Price;

use crate::db::settings::{ABOUT_KEY, AboutContent, BANNERS_KEY, Banner, SettingsRepository};
use crate::error::Result;
use crate::state::AppState;

/// Public shipping pricing, without the sender block.
#[derive(Debug, Serialize)]
pub struct ShippingView {
    pub flat_rate: Price,
    pub free_above: Price,
}

/// `GET /content/banners` - home carousel banners.
#[instrument(skip(state))]
pub async fn banners(State(state): State<AppState>) -> Result<Json<Vec<Banner>>> {
    let banners = SettingsRepository::new(state.pool())
        .get::<Vec<Banner>>(BANNERS_KEY)
        .await?
        .unwrap_or_default();

    Ok(Json(banners))
}

/// `GET /content/about` - about page content.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> Result<Json<AboutContent>> {
    let about = SettingsRepository::new(state.pool())
        .get::<AboutContent>(ABOUT_KEY)
        .await?
        .unwrap_or_default();

    Ok(Json(about))
}

/// `GET /content/shipping` - flat rate and free-shipping threshold.
///
/// The sender block stays private; labels are printed by the admin
/// service.
#[instrument(skip(state))]
pub async fn shipping(State(state): State<AppState>) -> Result<Json<ShippingView>> {
    let config = SettingsRepository::new(state.pool()).shipping_config().await?;

    Ok(Json(ShippingView {
        flat_rate: config.flat_rate,
        free_above: config.free_above,
    }))
}
