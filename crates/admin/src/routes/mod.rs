//! HTTP route handlers for the admin panel.
//!
//! Everything under `/api/` takes the `RequireAdmin` extractor and
//! answers 401 without a logged-in team member.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Auth
//! POST /auth/login                      - Team login (is_admin gate)
//! POST /auth/logout                     - Logout
//! GET  /auth/me                         - Current session admin
//!
//! # Products
//! GET    /api/products                  - All products, active and inactive
//! POST   /api/products                  - Create product
//! GET    /api/products/low-stock        - Products at or below alert level
//! GET    /api/products/{id}             - Product detail
//! PUT    /api/products/{id}             - Update product
//! DELETE /api/products/{id}             - Delete product
//! PATCH  /api/products/{id}/active      - Activate / deactivate
//! POST   /api/products/{id}/restock     - Add stock units
//! POST   /api/products/images           - Upload image, returns public URL
//! DELETE /api/products/images           - Delete image by URL
//!
//! # Orders
//! GET  /api/orders                      - Order book (?status=)
//! GET  /api/orders/{id}                 - Order detail
//! POST /api/orders/{id}/status          - Lifecycle transition
//! POST /api/orders/{id}/cancel          - Cancel (restocks deducted lines)
//! GET  /api/orders/{id}/label           - Shipping label document
//!
//! # Analytics
//! GET  /api/analytics/summary           - Revenue, counts by status
//! GET  /api/analytics/monthly           - Monthly revenue series
//! GET  /api/analytics/top-products      - Best sellers (?limit=)
//!
//! # Content
//! GET  /api/content/banners             - Home banners
//! PUT  /api/content/banners             - Replace home banners
//! GET  /api/content/about               - About page content
//! PUT  /api/content/about               - Replace about page content
//! GET  /api/content/shipping            - Shipping config incl. sender
//! PUT  /api/content/shipping            - Replace shipping config
//!
//! # Team
//! GET  /api/team                        - All profiles, admins first
//! POST /api/team/grant                  - Grant admin by email
//! POST /api/team/revoke                 - Revoke admin by email
//! ```

pub mod analytics;
pub mod auth;
pub mod content;
pub mod orders;
pub mod products;
pub mod team;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/low-stock", get(products::low_stock))
        .route(
            "/images",
            post(products::upload_image).delete(products::delete_image),
        )
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/{id}/active", patch(products::set_active))
        .route("/{id}/restock", post(products::restock))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::set_status))
        .route("/{id}/cancel", post(orders::cancel))
        .route("/{id}/label", get(orders::label))
}

/// Create the analytics routes router.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(analytics::summary))
        .route("/monthly", get(analytics::monthly))
        .route("/top-products", get(analytics::top_products))
}

/// Create the content routes router.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/banners",
            get(content::banners).put(content::put_banners),
        )
        .route("/about", get(content::about).put(content::put_about))
        .route(
            "/shipping",
            get(content::shipping).put(content::put_shipping),
        )
}

/// Create the team routes router.
pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(team::index))
        .route("/grant", post(team::grant))
        .route("/revoke", post(team::revoke))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}
