//! Storefront data models.

pub mod user;

pub use user::{CurrentUser, Profile};

/// Session storage keys.
pub mod session_keys {
    /// The logged-in customer ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
    /// The shopper's cart (`dona_onca_core::cart::Cart`).
    pub const CART: &str = "cart";
    /// The in-progress checkout wizard.
    pub const CHECKOUT: &str = "checkout";
}
