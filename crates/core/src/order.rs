//! Order records.
//!
//! An order freezes everything it needs at creation time: line items carry
//! the product name and unit price as they were sold, and the shipping
//! address is a snapshot, not a reference into `user_addresses`. Orders are
//! never deleted; cancellation is a status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, PaymentMethod, Price, ProductId, UserId};

/// A frozen order line: a copy of the sold product data, not a live join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderItem {
    /// Line total (`unit_price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Shipping address snapshot stored on the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingAddress {
    pub recipient: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub cep: String,
}

/// An order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub address: ShippingAddress,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// When stock was deducted for this order, if it has been. This is the
    /// persisted idempotency guard: checkout stamps it inside the creation
    /// transaction, and the admin shipping flow only deducts when it wins
    /// the conditional claim on a still-NULL value. Survives reloads and
    /// concurrent admin sessions, unlike a client-held flag.
    pub stock_deducted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Total unit count across items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub address: ShippingAddress,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub payment_method: PaymentMethod,
    /// Whether creation must deduct stock for every item (the checkout
    /// path). Seeded or manually entered orders pass false and are
    /// deducted later by the shipping flow.
    pub deduct_stock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_count_sums_quantities() {
        let order = Order {
            id: OrderId::generate(),
            user_id: UserId::new(1),
            items: vec![
                OrderItem {
                    product_id: ProductId::new(1),
                    name: "Body Fio Terra".into(),
                    size: "M".into(),
                    color: "Preto".into(),
                    quantity: 2,
                    unit_price: Price::from_centavos(5000),
                },
                OrderItem {
                    product_id: ProductId::new(2),
                    name: "Camisola Seda".into(),
                    size: "Único".into(),
                    color: "Único".into(),
                    quantity: 1,
                    unit_price: Price::from_centavos(3000),
                },
            ],
            address: ShippingAddress {
                recipient: "Maria Silva".into(),
                street: "Rua das Flores".into(),
                number: "45".into(),
                complement: Some("ap 31".into()),
                neighborhood: "Centro".into(),
                city: "Curitiba".into(),
                state: "PR".into(),
                cep: "80010-000".into(),
            },
            subtotal: Price::from_centavos(13000),
            shipping: Price::from_centavos(1500),
            total: Price::from_centavos(14500),
            payment_method: PaymentMethod::Pix,
            status: OrderStatus::Pendente,
            stock_deducted_at: None,
            created_at: Utc::now(),
        };
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.items[0].line_total(), Price::from_centavos(10000));
    }
}
