//! Integration tests for Dona Onça.
//!
//! These tests drive the storefront and admin services together over the
//! in-memory store, covering the flows that span both sides: checkout
//! deducting stock, fulfillment's once-only deduction guard, and stock
//! contention between concurrent buyers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dona-onca-integration-tests
//! ```

pub mod fixtures;
