//! Product listing and detail handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dona_onca_core::{Product, ProductCategory, ProductId};

use crate::error::{AppError, Result};
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    /// Category filter, by serialized name (e.g. `lingerie`).
    pub categoria: Option<ProductCategory>,
}

/// Product data exposed to the storefront.
///
/// Inactive products never reach this view, and internal fields like
/// `low_stock_alert` stay out of the public payload.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub category_label: &'static str,
    pub price: dona_onca_core::Price,
    pub original_price: Option<dona_onca_core::Price>,
    pub discount_percent: Option<u32>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category,
            category_label: product.category.label(),
            price: product.price,
            original_price: product.original_price,
            discount_percent: product.discount_percent(),
            sizes: product.size_options(),
            colors: product.color_options(),
            images: product.images.clone(),
            in_stock: product.stock > 0,
        }
    }
}

/// `GET /products` - list active products, optionally by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let catalog = CatalogService::new(state.pool(), state.catalog());
    let products = catalog.list_active(query.categoria).await?;

    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// `GET /products/{id}` - product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let catalog = CatalogService::new(state.pool(), state.catalog());
    let product = catalog
        .get(id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound("Produto não encontrado.".to_string()))?;

    Ok(Json(ProductView::from(&product)))
}
