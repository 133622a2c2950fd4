//! Session-resident shopping cart.
//!
//! The cart is plain data that lives in the shopper's session: line items
//! with a price snapshot taken at add-to-cart time. All operations are pure
//! local mutations; totals are always derived from the lines, never cached.

use serde::{Deserialize, Serialize};

use crate::product::{Product, SINGLE_VARIANT};
use crate::types::{Price, ProductId};

/// One product+variant+quantity entry in an in-progress order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// Synthetic line id, unique within this cart.
    pub line_id: u32,
    pub product_id: ProductId,
    pub product_name: String,
    /// Chosen size, or "Único" when the product has no size axis.
    pub size: String,
    /// Chosen color, or "Único" when the product has no color axis.
    pub color: String,
    pub quantity: u32,
    /// Price snapshot taken when the line was added. Not re-validated
    /// against the current catalog price.
    pub unit_price: Price,
    /// First product image, for the cart drawer.
    pub image: Option<String>,
}

impl CartLine {
    /// Line total (`unit_price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Input for adding an item to the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub image: Option<String>,
}

impl AddItem {
    /// Build an add-to-cart input from a catalog product.
    #[must_use]
    pub fn from_product(
        product: &Product,
        size: Option<String>,
        color: Option<String>,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            size,
            color,
            quantity,
            unit_price: product.price,
            image: product.images.first().cloned(),
        }
    }
}

/// Shipping pricing and sender data, kept in `site_settings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingConfig {
    /// Flat shipping rate below the free-shipping threshold.
    pub flat_rate: Price,
    /// Subtotal at or above which shipping is free.
    pub free_above: Price,
    /// Sender block printed on shipping labels.
    pub sender: SenderInfo,
}

/// Sender address and contact data for shipping labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderInfo {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub cep: String,
}

/// A shopper's cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    next_line_id: u32,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            next_line_id: 1,
        }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Add an item, merging into an existing line when the product, size,
    /// and color all match. Returns the line id the item landed on.
    ///
    /// Zero-quantity adds are ignored.
    pub fn add_item(&mut self, input: AddItem) -> Option<u32> {
        if input.quantity == 0 {
            return None;
        }

        let size = input.size.unwrap_or_else(|| SINGLE_VARIANT.to_string());
        let color = input.color.unwrap_or_else(|| SINGLE_VARIANT.to_string());

        if let Some(line) = self.lines.iter_mut().find(|l| {
            l.product_id == input.product_id && l.size == size && l.color == color
        }) {
            line.quantity += input.quantity;
            return Some(line.line_id);
        }

        let line_id = self.next_line_id;
        self.next_line_id += 1;
        self.lines.push(CartLine {
            line_id,
            product_id: input.product_id,
            product_name: input.product_name,
            size,
            color,
            quantity: input.quantity,
            unit_price: input.unit_price,
            image: input.image,
        });
        Some(line_id)
    }

    /// Set a line's quantity. Setting 0 removes the line, exactly as
    /// [`Cart::remove_line`] would. Returns whether the line existed.
    pub fn update_quantity(&mut self, line_id: u32, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_line(line_id);
        }
        match self.lines.iter_mut().find(|l| l.line_id == line_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns whether the line existed.
    pub fn remove_line(&mut self, line_id: u32) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);
        self.lines.len() != before
    }

    /// Drop every line (order completed or cart abandoned).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total item count across lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Derived subtotal: Σ `unit_price × quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Shipping cost for this cart under the given config.
    #[must_use]
    pub fn shipping(&self, config: &ShippingConfig) -> Price {
        if self.is_empty() || self.subtotal() >= config.free_above {
            Price::ZERO
        } else {
            config.flat_rate
        }
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self, config: &ShippingConfig) -> Price {
        self.subtotal() + self.shipping(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(product_id: i32, qty: u32, centavos: i64) -> AddItem {
        AddItem {
            product_id: ProductId::new(product_id),
            product_name: format!("Produto {product_id}"),
            size: None,
            color: None,
            quantity: qty,
            unit_price: Price::from_centavos(centavos),
            image: None,
        }
    }

    fn config() -> ShippingConfig {
        ShippingConfig {
            flat_rate: Price::from_centavos(1500),
            free_above: Price::from_centavos(20000),
            sender: SenderInfo {
                name: "Dona Onça".into(),
                phone: "+55 11 99999-0000".into(),
                street: "Rua Augusta".into(),
                number: "1200".into(),
                complement: None,
                neighborhood: "Consolação".into(),
                city: "São Paulo".into(),
                state: "SP".into(),
                cep: "01304-001".into(),
            },
        }
    }

    #[test]
    fn add_merges_matching_variant_lines() {
        let mut cart = Cart::new();
        let first = cart.add_item(add(1, 1, 5000));
        let second = cart.add_item(add(1, 2, 5000));
        assert_eq!(first, second);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn different_variants_get_separate_lines() {
        let mut cart = Cart::new();
        let mut item = add(1, 1, 5000);
        item.size = Some("P".into());
        cart.add_item(item);
        let mut item = add(1, 1, 5000);
        item.size = Some("M".into());
        cart.add_item(item);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn subtotal_is_always_derived_from_lines() {
        // (qty 2 × 50,00) + (qty 1 × 30,00) = 130,00
        let mut cart = Cart::new();
        cart.add_item(add(1, 2, 5000));
        cart.add_item(add(2, 1, 3000));
        assert_eq!(cart.subtotal(), Price::from_centavos(13000));

        let line_id = cart.lines()[0].line_id;
        cart.update_quantity(line_id, 3);
        assert_eq!(cart.subtotal(), Price::from_centavos(18000));
    }

    #[test]
    fn update_to_zero_equals_remove() {
        let mut a = Cart::new();
        let mut b = Cart::new();
        let id_a = a.add_item(add(1, 2, 5000)).expect("line added");
        let id_b = b.add_item(add(1, 2, 5000)).expect("line added");

        a.update_quantity(id_a, 0);
        b.remove_line(id_b);
        assert!(a.is_empty());
        assert_eq!(a.lines(), b.lines());
    }

    #[test]
    fn zero_quantity_add_is_ignored() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_item(add(1, 0, 5000)), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn line_ids_are_not_reused_after_removal() {
        let mut cart = Cart::new();
        let first = cart.add_item(add(1, 1, 5000)).expect("line added");
        cart.remove_line(first);
        let second = cart.add_item(add(1, 1, 5000)).expect("line added");
        assert_ne!(first, second);
    }

    #[test]
    fn shipping_is_free_at_threshold() {
        let config = config();
        let mut cart = Cart::new();
        cart.add_item(add(1, 1, 19999));
        assert_eq!(cart.shipping(&config), Price::from_centavos(1500));
        assert_eq!(cart.total(&config), Price::from_centavos(21499));

        cart.add_item(add(2, 1, 1));
        assert_eq!(cart.shipping(&config), Price::ZERO);
    }

    #[test]
    fn empty_cart_ships_free() {
        assert_eq!(Cart::new().shipping(&config()), Price::ZERO);
    }
}
