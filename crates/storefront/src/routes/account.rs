//! Account route handlers: order history and saved addresses.
//!
//! Every handler requires a logged-in user, and every query is scoped
//! to that user. An order or address belonging to someone else answers
//! 404, never 403, so ids don't leak existence.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use dona_onca_core::order::Order;
use dona_onca_core::{AddressId, Cep, OrderId};

use crate::db::addresses::{AddressInput, AddressRepository, UserAddress};
use crate::db::orders::OrderRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::user::Profile;
use crate::state::AppState;

/// Body for creating or updating an address.
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
    #[serde(default)]
    pub is_default: bool,
}

impl AddressBody {
    fn into_input(self) -> Result<AddressInput> {
        let cep = Cep::parse(&self.cep)
            .map_err(|_| AppError::BadRequest("CEP inválido.".to_string()))?;

        Ok(AddressInput {
            recipient: self.recipient.trim().to_string(),
            street: self.street,
            number: self.number,
            complement: self.complement,
            neighborhood: self.neighborhood,
            city: self.city,
            state: self.state,
            cep: cep.formatted(),
            is_default: self.is_default,
        })
    }
}

/// `GET /account/profile` - the full profile behind the session.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Profile>> {
    let profile = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Perfil não encontrado.".to_string()))?;

    Ok(Json(profile))
}

/// `GET /account/orders` - the user's order history, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(orders))
}

/// `GET /account/orders/{id}` - one of the user's orders.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn order_detail(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .fetch(id)
        .await?
        .filter(|o| o.user_id == user.id)
        .ok_or_else(|| AppError::NotFound("Pedido não encontrado.".to_string()))?;

    Ok(Json(order))
}

/// `GET /account/addresses` - the user's saved addresses, default first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<UserAddress>>> {
    let addresses = AddressRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(addresses))
}

/// `POST /account/addresses` - save a new address.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<AddressBody>,
) -> Result<Json<UserAddress>> {
    let address = AddressRepository::new(state.pool())
        .create(user.id, body.into_input()?)
        .await?;

    Ok(Json(address))
}

/// `PUT /account/addresses/{id}` - update a saved address.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<AddressId>,
    Json(body): Json<AddressBody>,
) -> Result<Json<UserAddress>> {
    let address = AddressRepository::new(state.pool())
        .update(user.id, id, body.into_input()?)
        .await?
        .ok_or_else(|| AppError::NotFound("Endereço não encontrado.".to_string()))?;

    Ok(Json(address))
}

/// `DELETE /account/addresses/{id}` - remove a saved address.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<AddressId>,
) -> Result<Json<serde_json::Value>> {
    let deleted = AddressRepository::new(state.pool()).delete(user.id, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Endereço não encontrado.".to_string()));
    }

    Ok(Json(json!({ "ok": true })))
}
