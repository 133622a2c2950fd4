//! Order book handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use dona_onca_core::order::Order;
use dona_onca_core::{OrderId, OrderStatus};

use crate::db::orders::AdminOrderRepository;
use crate::db::products::AdminProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::fulfillment::FulfillmentService;
use crate::services::label::{LabelService, ShippingLabel};
use crate::state::AppState;

/// Query for `GET /api/orders`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
}

/// `GET /api/orders` - the order book, optionally filtered by status.
#[instrument(skip(state, _admin))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Order>>> {
    let orders = AdminOrderRepository::new(state.pool())
        .list(query.status)
        .await?;

    Ok(Json(orders))
}

/// `GET /api/orders/{id}` - order detail.
#[instrument(skip(state, _admin))]
pub async fn show(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>> {
    let order = AdminOrderRepository::new(state.pool())
        .fetch(OrderId::from_uuid(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Pedido não encontrado.".to_string()))?;

    Ok(Json(order))
}

/// Body for `POST /api/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusBody {
    pub status: OrderStatus,
}

/// `POST /api/orders/{id}/status` - transition an order.
///
/// Moving to Enviado deducts stock at most once per order; moving to
/// Cancelado restocks deducted lines. Every other transition is a plain
/// status change, validated against the lifecycle.
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn set_status(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetStatusBody>,
) -> Result<Json<Order>> {
    let catalog = AdminProductRepository::new(state.pool());
    let orders = AdminOrderRepository::new(state.pool());
    let service = FulfillmentService::new(&catalog, &orders);

    let order = service.transition(OrderId::from_uuid(id), body.status).await?;

    info!(order_id = %order.id, status = %order.status, "order status changed");

    Ok(Json(order))
}

/// `POST /api/orders/{id}/cancel` - cancel an order.
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn cancel(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>> {
    let catalog = AdminProductRepository::new(state.pool());
    let orders = AdminOrderRepository::new(state.pool());
    let service = FulfillmentService::new(&catalog, &orders);

    let order = service.cancel(OrderId::from_uuid(id)).await?;

    info!(order_id = %order.id, "order cancelled");

    Ok(Json(order))
}

/// `GET /api/orders/{id}/label` - shipping label document.
#[instrument(skip(state, _admin))]
pub async fn label(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShippingLabel>> {
    let label = LabelService::new(state.pool())
        .for_order(OrderId::from_uuid(id))
        .await?;

    Ok(Json(label))
}
