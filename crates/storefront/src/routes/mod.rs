//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Products
//! GET  /products                   - Active product listing (?categoria=)
//! GET  /products/{id}              - Product detail
//!
//! # Cart (session-resident)
//! GET  /cart                       - Cart with totals
//! POST /cart/add                   - Add item (price snapshot)
//! POST /cart/update                - Update line quantity (0 removes)
//! POST /cart/remove                - Remove line
//! GET  /cart/count                 - Item count badge
//!
//! # Checkout (session wizard, requires auth to finalize)
//! GET  /checkout                   - Wizard state + totals
//! POST /checkout/buyer             - Submit buyer step
//! POST /checkout/address           - Submit address step
//! POST /checkout/payment           - Submit payment step
//! POST /checkout/back              - Step back
//! POST /checkout/finalize          - Create the order, deduct stock
//! GET  /checkout/cep/{cep}         - CEP lookup proxy
//!
//! # Auth
//! POST /auth/register              - Register
//! POST /auth/login                 - Login
//! POST /auth/logout                - Logout
//! GET  /auth/me                    - Current session user
//!
//! # Account (requires auth)
//! GET    /account/profile          - Full profile
//! GET    /account/orders           - Order history
//! GET    /account/orders/{id}      - Order detail
//! GET    /account/addresses        - Saved addresses
//! POST   /account/addresses        - Create address
//! PUT    /account/addresses/{id}   - Update address
//! DELETE /account/addresses/{id}   - Delete address
//!
//! # Content
//! GET  /content/banners            - Home banners
//! GET  /content/about              - About page content
//! GET  /content/shipping           - Shipping pricing (rate + threshold)
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod content;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/buyer", post(checkout::submit_buyer))
        .route("/address", post(checkout::submit_address))
        .route("/payment", post(checkout::submit_payment))
        .route("/back", post(checkout::back))
        .route("/finalize", post(checkout::finalize))
        .route("/cep/{cep}", get(checkout::lookup_cep))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(account::profile))
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order_detail))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            axum::routing::put(account::update_address).delete(account::delete_address),
        )
}

/// Create the content routes router.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/banners", get(content::banners))
        .route("/about", get(content::about))
        .route("/shipping", get(content::shipping))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}
