//! Catalog management handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, header},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use dona_onca_core::product::Product;
use dona_onca_core::store::CatalogStore;
use dona_onca_core::{Price, ProductCategory, ProductId};

use crate::db::products::{AdminProductRepository, ProductInput};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Body for product create and update.
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub price: Price,
    pub original_price: Option<Price>,
    #[serde(default)]
    pub has_sizes: bool,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub has_colors: bool,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_low_stock_alert")]
    pub low_stock_alert: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_low_stock_alert() -> i32 {
    5
}

const fn default_active() -> bool {
    true
}

impl ProductBody {
    fn into_input(self) -> Result<ProductInput> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "O nome do produto é obrigatório.".to_string(),
            ));
        }
        if self.price <= Price::ZERO {
            return Err(AppError::BadRequest(
                "O preço deve ser maior que zero.".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(AppError::BadRequest(
                "O estoque não pode ser negativo.".to_string(),
            ));
        }

        Ok(ProductInput {
            name: self.name.trim().to_string(),
            description: self.description,
            category: self.category,
            price: self.price,
            original_price: self.original_price,
            has_sizes: self.has_sizes,
            sizes: self.sizes,
            has_colors: self.has_colors,
            colors: self.colors,
            images: self.images,
            stock: self.stock,
            low_stock_alert: self.low_stock_alert,
            active: self.active,
        })
    }
}

/// `GET /api/products` - every product, active or not.
#[instrument(skip(state, _admin))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = AdminProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(products))
}

/// `GET /api/products/low-stock` - the restock worklist.
#[instrument(skip(state, _admin))]
pub async fn low_stock(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = AdminProductRepository::new(state.pool()).low_stock().await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}` - product detail.
#[instrument(skip(state, _admin))]
pub async fn show(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = AdminProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Produto não encontrado.".to_string()))?;

    Ok(Json(product))
}

/// `POST /api/products` - create a product.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.id))]
pub async fn create(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>> {
    let input = body.into_input()?;
    let product = AdminProductRepository::new(state.pool())
        .create(&input)
        .await?;

    info!(product_id = %product.id, name = %product.name, "product created");

    Ok(Json(product))
}

/// `PUT /api/products/{id}` - replace every writable field.
#[instrument(skip(state, _admin, body))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>> {
    let input = body.into_input()?;
    let product = AdminProductRepository::new(state.pool())
        .update(ProductId::new(id), &input)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto não encontrado.".to_string()))?;

    Ok(Json(product))
}

/// Body for `PATCH /api/products/{id}/active`.
#[derive(Debug, Deserialize)]
pub struct SetActiveBody {
    pub active: bool,
}

/// `PATCH /api/products/{id}/active` - show or hide in the shop.
#[instrument(skip(state, _admin))]
pub async fn set_active(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<SetActiveBody>,
) -> Result<Json<Product>> {
    let product = AdminProductRepository::new(state.pool())
        .set_active(ProductId::new(id), body.active)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto não encontrado.".to_string()))?;

    Ok(Json(product))
}

/// Body for `POST /api/products/{id}/restock`.
#[derive(Debug, Deserialize)]
pub struct RestockBody {
    pub quantity: u32,
}

/// `POST /api/products/{id}/restock` - add units back to stock.
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn restock(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<RestockBody>,
) -> Result<Json<serde_json::Value>> {
    if body.quantity == 0 {
        return Err(AppError::BadRequest(
            "A quantidade deve ser maior que zero.".to_string(),
        ));
    }

    let stock = AdminProductRepository::new(state.pool())
        .restock(ProductId::new(id), body.quantity)
        .await?;

    info!(product_id = id, quantity = body.quantity, stock, "restocked");

    Ok(Json(json!({ "stock": stock })))
}

/// `DELETE /api/products/{id}` - remove a product.
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn destroy(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let deleted = AdminProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Produto não encontrado.".to_string()));
    }

    info!(product_id = id, "product deleted");

    Ok(Json(json!({ "ok": true })))
}

/// `POST /api/products/images` - upload an image, answering its public URL.
///
/// The request body is the raw image; the `Content-Type` header decides
/// the stored extension.
#[instrument(skip(state, _admin, headers, bytes))]
pub async fn upload_image(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Result<Json<serde_json::Value>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Content-Type é obrigatório.".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("O arquivo está vazio.".to_string()));
    }

    let url = state.storage().upload(content_type, bytes.to_vec()).await?;

    Ok(Json(json!({ "url": url })))
}

/// Body for `DELETE /api/products/images`.
#[derive(Debug, Deserialize)]
pub struct DeleteImageBody {
    pub url: String,
}

/// `DELETE /api/products/images` - delete an uploaded image by URL.
#[instrument(skip(state, _admin, body))]
pub async fn delete_image(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<DeleteImageBody>,
) -> Result<Json<serde_json::Value>> {
    state.storage().delete(&body.url).await?;
    Ok(Json(json!({ "ok": true })))
}
