//! Cart route handlers.
//!
//! The cart lives in the session. Prices are snapshotted at add time,
//! totals are always derived from the lines, and shipping is computed
//! against the config in `site_settings` on every read.

use axum::{
    Json,
    extract::State,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use dona_onca_core::cart::{AddItem, Cart, CartLine, ShippingConfig};
use dona_onca_core::{Price, ProductId};

use crate::db::settings::SettingsRepository;
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Cart payload with derived totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    /// Threshold for free shipping, for the "faltam R$ X" banner.
    pub free_shipping_above: Price,
}

impl CartView {
    fn build(cart: &Cart, config: &ShippingConfig) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
            shipping: cart.shipping(config),
            total: cart.total(config),
            free_shipping_above: config.free_above,
        }
    }
}

/// Body for `POST /cart/add`.
#[derive(Debug, Deserialize)]
pub struct AddBody {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Body for `POST /cart/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    pub line_id: u32,
    pub quantity: u32,
}

/// Body for `POST /cart/remove`.
#[derive(Debug, Deserialize)]
pub struct RemoveBody {
    pub line_id: u32,
}

/// Load the session cart, or an empty one.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Persist the cart back into the session.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// `GET /cart` - cart contents with totals.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    let config = SettingsRepository::new(state.pool()).shipping_config().await?;

    Ok(Json(CartView::build(&cart, &config)))
}

/// `POST /cart/add` - add an item, snapshotting the current price.
///
/// Lines with the same product, size and color merge by summing
/// quantities.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddBody>,
) -> Result<Json<CartView>> {
    if body.quantity == 0 {
        return Err(AppError::BadRequest(
            "A quantidade deve ser maior que zero.".to_string(),
        ));
    }

    let catalog = CatalogService::new(state.pool(), state.catalog());
    let product = catalog
        .get(body.product_id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound("Produto não encontrado.".to_string()))?;

    let mut cart = load_cart(&session).await?;
    cart.add_item(AddItem::from_product(
        &product,
        body.size,
        body.color,
        body.quantity,
    ));
    save_cart(&session, &cart).await?;

    let config = SettingsRepository::new(state.pool()).shipping_config().await?;
    Ok(Json(CartView::build(&cart, &config)))
}

/// `POST /cart/update` - set a line's quantity; zero removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<UpdateBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.update_quantity(body.line_id, body.quantity) {
        return Err(AppError::NotFound(
            "Item não encontrado no carrinho.".to_string(),
        ));
    }
    save_cart(&session, &cart).await?;

    let config = SettingsRepository::new(state.pool()).shipping_config().await?;
    Ok(Json(CartView::build(&cart, &config)))
}

/// `POST /cart/remove` - remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RemoveBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.remove_line(body.line_id) {
        return Err(AppError::NotFound(
            "Item não encontrado no carrinho.".to_string(),
        ));
    }
    save_cart(&session, &cart).await?;

    let config = SettingsRepository::new(state.pool()).shipping_config().await?;
    Ok(Json(CartView::build(&cart, &config)))
}

/// `GET /cart/count` - item count for the header badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<serde_json::Value>> {
    let cart = load_cart(&session).await?;
    Ok(Json(json!({ "count": cart.item_count() })))
}
