//! Business logic services for the admin panel.
//!
//! - [`auth`] - Team login with the `is_admin` gate
//! - [`fulfillment`] - Order lifecycle with the once-only stock deduction
//! - [`analytics`] - Revenue and sales aggregation over the order book
//! - [`storage`] - Product image uploads to the object storage bucket
//! - [`label`] - Shipping label documents for orders

pub mod analytics;
pub mod auth;
pub mod fulfillment;
pub mod label;
pub mod storage;
