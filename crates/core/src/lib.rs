//! Dona Onça Core - Shared types and domain logic.
//!
//! This crate provides the common types used across all Dona Onça components:
//! - `storefront` - Public-facing shop API
//! - `admin` - Internal back-office panel
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types, traits, and pure domain logic - no
//! HTTP, no database access. The shop's one piece of real state-machine
//! behavior lives here: the cart, the checkout wizard, and the order status
//! lifecycle, all defined against the [`store`] traits so the services can
//! plug in PostgreSQL repositories and the tests can plug in in-memory
//! fakes.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, CEPs,
//!   and the category/status/payment enums
//! - [`product`] - The catalog product model
//! - [`cart`] - Session-resident shopping cart
//! - [`checkout`] - Three-step checkout wizard state machine
//! - [`order`] - Order records and their frozen line items
//! - [`store`] - Catalog/order store traits plus the in-memory fake

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod order;
pub mod product;
pub mod store;
pub mod types;

pub use product::Product;
pub use types::*;
