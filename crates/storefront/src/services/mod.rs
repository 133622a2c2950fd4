//! Business logic services for the storefront.
//!
//! - `auth` - registration and login with Argon2id password hashing
//! - `catalog` - cached active-product listings
//! - `cep` - ViaCEP postal code lookup for the checkout address step
//! - `checkout` - cart + wizard finalization into a persisted order

pub mod auth;
pub mod catalog;
pub mod cep;
pub mod checkout;
