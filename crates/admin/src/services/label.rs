//! Shipping label documents.
//!
//! A label pairs the sender block from the shipping configuration in
//! `site_settings` with the recipient snapshot frozen on the order, so
//! every workstation prints the same sender and an address edit after
//! purchase never rewrites a label.

use serde::Serialize;
use sqlx::PgPool;

use dona_onca_core::cart::SenderInfo;
use dona_onca_core::order::Order;
use dona_onca_core::{OrderId, Price};

use crate::db::orders::AdminOrderRepository;
use crate::db::settings::SettingsRepository;
use crate::error::{AppError, Result};

/// A printable shipping label for one order.
#[derive(Debug, Serialize)]
pub struct ShippingLabel {
    pub order_id: OrderId,
    pub sender: LabelParty,
    pub recipient: LabelParty,
    /// One line per order item, `quantity× name (size / color)`.
    pub items: Vec<String>,
    /// Declared value, the order's subtotal.
    pub declared_value: Price,
}

/// One side of the label.
#[derive(Debug, Serialize)]
pub struct LabelParty {
    pub name: String,
    pub street_line: String,
    pub neighborhood: String,
    pub city_line: String,
    pub cep: String,
}

/// Builds shipping labels from orders and the shipping configuration.
pub struct LabelService<'a> {
    orders: AdminOrderRepository<'a>,
    settings: SettingsRepository<'a>,
}

impl<'a> LabelService<'a> {
    /// Create a new label service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: AdminOrderRepository::new(pool),
            settings: SettingsRepository::new(pool),
        }
    }

    /// Build the label for an order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the order does not exist.
    pub async fn for_order(&self, id: OrderId) -> Result<ShippingLabel> {
        let order = self
            .orders
            .fetch(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido não encontrado.".to_string()))?;

        let sender = self.settings.shipping_config().await?.sender;

        Ok(build_label(&order, &sender))
    }
}

fn build_label(order: &Order, sender: &SenderInfo) -> ShippingLabel {
    let items = order
        .items
        .iter()
        .map(|item| {
            format!(
                "{}× {} ({} / {})",
                item.quantity, item.name, item.size, item.color
            )
        })
        .collect();

    ShippingLabel {
        order_id: order.id,
        sender: LabelParty {
            name: sender.name.clone(),
            street_line: street_line(&sender.street, &sender.number, sender.complement.as_deref()),
            neighborhood: sender.neighborhood.clone(),
            city_line: format!("{} - {}", sender.city, sender.state),
            cep: sender.cep.clone(),
        },
        recipient: LabelParty {
            name: order.address.recipient.clone(),
            street_line: street_line(
                &order.address.street,
                &order.address.number,
                order.address.complement.as_deref(),
            ),
            neighborhood: order.address.neighborhood.clone(),
            city_line: format!("{} - {}", order.address.city, order.address.state),
            cep: order.address.cep.clone(),
        },
        items,
        declared_value: order.subtotal,
    }
}

fn street_line(street: &str, number: &str, complement: Option<&str>) -> String {
    match complement {
        Some(complement) if !complement.is_empty() => format!("{street}, {number} - {complement}"),
        _ => format!("{street}, {number}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dona_onca_core::order::{OrderItem, ShippingAddress};
    use dona_onca_core::{OrderStatus, PaymentMethod, ProductId, UserId};

    fn sender() -> SenderInfo {
        SenderInfo {
            name: "Dona Onça".to_string(),
            phone: "11988887777".to_string(),
            street: "Rua do Comércio".to_string(),
            number: "200".to_string(),
            complement: Some("Sala 3".to_string()),
            neighborhood: "Centro".to_string(),
            city: "Campinas".to_string(),
            state: "SP".to_string(),
            cep: "13010-110".to_string(),
        }
    }

    fn order() -> Order {
        Order {
            id: OrderId::generate(),
            user_id: UserId::new(9),
            items: vec![OrderItem {
                product_id: ProductId::new(4),
                name: "Conjunto Safira".to_string(),
                size: "M".to_string(),
                color: "Azul".to_string(),
                quantity: 2,
                unit_price: Price::from_centavos(14900),
            }],
            address: ShippingAddress {
                recipient: "Bianca Lima".to_string(),
                street: "Av. Paulista".to_string(),
                number: "1000".to_string(),
                complement: None,
                neighborhood: "Bela Vista".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                cep: "01310-100".to_string(),
            },
            subtotal: Price::from_centavos(29800),
            shipping: Price::from_centavos(1990),
            total: Price::from_centavos(31790),
            payment_method: PaymentMethod::Cartao,
            status: OrderStatus::Pago,
            stock_deducted_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn label_freezes_recipient_from_the_order_snapshot() {
        let label = build_label(&order(), &sender());
        assert_eq!(label.recipient.name, "Bianca Lima");
        assert_eq!(label.recipient.street_line, "Av. Paulista, 1000");
        assert_eq!(label.recipient.city_line, "São Paulo - SP");
    }

    #[test]
    fn sender_complement_joins_the_street_line() {
        let label = build_label(&order(), &sender());
        assert_eq!(label.sender.street_line, "Rua do Comércio, 200 - Sala 3");
    }

    #[test]
    fn declared_value_is_the_subtotal_without_shipping() {
        let label = build_label(&order(), &sender());
        assert_eq!(label.declared_value, Price::from_centavos(29800));
    }

    #[test]
    fn item_lines_carry_quantity_and_variant() {
        let label = build_label(&order(), &sender());
        assert_eq!(label.items, vec!["2× Conjunto Safira (M / Azul)"]);
    }
}
