//! Checkout wizard handlers.
//!
//! The wizard is session-resident and moves through three steps: buyer
//! info, shipping address, payment method. Finalizing requires a logged
//! in user and atomically creates the order while deducting stock.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use dona_onca_core::checkout::{BuyerInfo, CheckoutStep, CheckoutWizard};
use dona_onca_core::order::{Order, ShippingAddress};
use dona_onca_core::{Cep, Email, PaymentMethod, Price};

use crate::db::orders::OrderRepository;
use crate::db::settings::SettingsRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::session_keys;
use crate::routes::cart::{load_cart, save_cart};
use crate::services::cep::CepAddress;
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

/// Wizard state plus cart totals, for rendering the checkout screen.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub buyer: Option<BuyerInfo>,
    pub address: Option<ShippingAddress>,
    pub payment: Option<PaymentMethod>,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

/// Body for `POST /checkout/buyer`.
#[derive(Debug, Deserialize)]
pub struct BuyerBody {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Body for `POST /checkout/address`.
#[derive(Debug, Deserialize)]
pub struct AddressBody {
    pub recipient: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub cep: String,
}

/// Body for `POST /checkout/payment`.
#[derive(Debug, Deserialize)]
pub struct PaymentBody {
    pub payment_method: PaymentMethod,
}

/// Load the session wizard, or a fresh one.
async fn load_wizard(session: &Session) -> Result<CheckoutWizard> {
    Ok(session
        .get::<CheckoutWizard>(session_keys::CHECKOUT)
        .await?
        .unwrap_or_default())
}

/// Persist the wizard back into the session.
async fn save_wizard(session: &Session, wizard: &CheckoutWizard) -> Result<()> {
    session.insert(session_keys::CHECKOUT, wizard).await?;
    Ok(())
}

async fn view(state: &AppState, session: &Session) -> Result<CheckoutView> {
    let cart = load_cart(session).await?;
    let wizard = load_wizard(session).await?;
    let config = SettingsRepository::new(state.pool()).shipping_config().await?;

    Ok(CheckoutView {
        step: wizard.step(),
        buyer: wizard.buyer().cloned(),
        address: wizard.address().cloned(),
        payment: wizard.payment(),
        subtotal: cart.subtotal(),
        shipping: cart.shipping(&config),
        total: cart.total(&config),
    })
}

/// `GET /checkout` - current wizard state and totals.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    Ok(Json(view(&state, &session).await?))
}

/// `POST /checkout/buyer` - submit the buyer info step.
#[instrument(skip(state, session, body))]
pub async fn submit_buyer(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<BuyerBody>,
) -> Result<Json<CheckoutView>> {
    let email = Email::parse(&body.email)
        .map_err(|_| AppError::BadRequest("E-mail inválido.".to_string()))?;

    let mut wizard = load_wizard(&session).await?;
    wizard.submit_buyer(BuyerInfo {
        full_name: body.full_name.trim().to_string(),
        email,
        phone: body.phone.trim().to_string(),
    })?;
    save_wizard(&session, &wizard).await?;

    Ok(Json(view(&state, &session).await?))
}

/// `POST /checkout/address` - submit the address step.
#[instrument(skip(state, session, body))]
pub async fn submit_address(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddressBody>,
) -> Result<Json<CheckoutView>> {
    let cep = Cep::parse(&body.cep)
        .map_err(|_| AppError::BadRequest("CEP inválido.".to_string()))?;

    let mut wizard = load_wizard(&session).await?;
    wizard.submit_address(ShippingAddress {
        recipient: body.recipient.trim().to_string(),
        street: body.street,
        number: body.number,
        complement: body.complement,
        neighborhood: body.neighborhood,
        city: body.city,
        state: body.state,
        cep: cep.formatted(),
    })?;
    save_wizard(&session, &wizard).await?;

    Ok(Json(view(&state, &session).await?))
}

/// `POST /checkout/payment` - submit the payment method step.
#[instrument(skip(state, session))]
pub async fn submit_payment(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<PaymentBody>,
) -> Result<Json<CheckoutView>> {
    let mut wizard = load_wizard(&session).await?;
    wizard.submit_payment(body.payment_method)?;
    save_wizard(&session, &wizard).await?;

    Ok(Json(view(&state, &session).await?))
}

/// `POST /checkout/back` - step back in the wizard.
#[instrument(skip(state, session))]
pub async fn back(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    let mut wizard = load_wizard(&session).await?;
    wizard.back();
    save_wizard(&session, &wizard).await?;

    Ok(Json(view(&state, &session).await?))
}

/// `POST /checkout/finalize` - create the order and deduct stock.
///
/// On success the cart and the wizard are cleared from the session. On
/// any failure (missing step, insufficient stock) both stay untouched
/// so the shopper can correct and retry.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn finalize(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Json<Order>> {
    let cart = load_cart(&session).await?;
    let wizard = load_wizard(&session).await?;
    let config = SettingsRepository::new(state.pool()).shipping_config().await?;

    let orders = OrderRepository::new(state.pool());
    let order = CheckoutService::new(&orders)
        .finalize(user.id, &cart, wizard, &config)
        .await?;

    save_cart(&session, &dona_onca_core::cart::Cart::new()).await?;
    let _ = session
        .remove::<CheckoutWizard>(session_keys::CHECKOUT)
        .await?;

    info!(order_id = %order.id, total = %order.total, "order placed");

    Ok(Json(order))
}

/// `GET /checkout/cep/{cep}` - resolve a CEP into an address.
#[instrument(skip(state))]
pub async fn lookup_cep(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<CepAddress>> {
    let address = state.cep().lookup(&cep).await?;
    Ok(Json(address))
}
