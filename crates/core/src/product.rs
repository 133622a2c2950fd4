//! Catalog product model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductCategory, ProductId};

/// Variant label used when a product has no size or color axis.
pub const SINGLE_VARIANT: &str = "Único";

/// A catalog product.
///
/// `stock` is the shared resource of the whole system: it is decremented by
/// checkout and by the admin shipping flow, always through the atomic
/// store operations (see [`crate::store::CatalogStore`]), and must never go
/// negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub price: Price,
    /// Pre-discount price for strike-through display, when on sale.
    pub original_price: Option<Price>,
    /// Whether the size axis is enabled for this product.
    pub has_sizes: bool,
    pub sizes: Vec<String>,
    /// Whether the color axis is enabled for this product.
    pub has_colors: bool,
    pub colors: Vec<String>,
    /// Public URLs in the product-images bucket.
    pub images: Vec<String>,
    pub stock: i32,
    /// Threshold below which the admin panel flags the product.
    pub low_stock_alert: i32,
    /// Hidden from the storefront when false; not a deletion.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether stock has fallen to or below the alert threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_alert
    }

    /// Discount percentage against `original_price`, when on sale.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        use rust_decimal::Decimal;
        use rust_decimal::prelude::ToPrimitive;

        let original = self.original_price?.amount();
        if original <= Decimal::ZERO || self.price.amount() >= original {
            return None;
        }
        let percent = (Decimal::ONE - self.price.amount() / original) * Decimal::ONE_HUNDRED;
        percent.round().to_u32()
    }

    /// Sizes offered, or the single-variant default.
    #[must_use]
    pub fn size_options(&self) -> Vec<String> {
        if self.has_sizes && !self.sizes.is_empty() {
            self.sizes.clone()
        } else {
            vec![SINGLE_VARIANT.to_string()]
        }
    }

    /// Colors offered, or the single-variant default.
    #[must_use]
    pub fn color_options(&self) -> Vec<String> {
        if self.has_colors && !self.colors.is_empty() {
            self.colors.clone()
        } else {
            vec![SINGLE_VARIANT.to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Conjunto Onça Pintada".to_string(),
            description: "Conjunto em renda".to_string(),
            category: ProductCategory::Conjuntos,
            price: Price::from_centavos(9990),
            original_price: None,
            has_sizes: true,
            sizes: vec!["P".into(), "M".into(), "G".into()],
            has_colors: false,
            colors: Vec::new(),
            images: Vec::new(),
            stock: 10,
            low_stock_alert: 3,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn low_stock_uses_threshold_inclusively() {
        let mut product = sample();
        assert!(!product.is_low_stock());
        product.stock = 3;
        assert!(product.is_low_stock());
    }

    #[test]
    fn discount_percent_from_original_price() {
        let mut product = sample();
        product.original_price = Some(Price::from_centavos(19980));
        assert_eq!(product.discount_percent(), Some(50));
    }

    #[test]
    fn no_discount_without_markdown() {
        let mut product = sample();
        assert_eq!(product.discount_percent(), None);
        product.original_price = Some(Price::from_centavos(5000));
        // Original below current price is not a discount
        assert_eq!(product.discount_percent(), None);
    }

    #[test]
    fn disabled_axes_fall_back_to_single_variant() {
        let product = sample();
        assert_eq!(product.size_options(), vec!["P", "M", "G"]);
        assert_eq!(product.color_options(), vec![SINGLE_VARIANT]);
    }
}
