//! Status and category enums.
//!
//! The order status values are stored in Portuguese, exactly as the shop
//! displays them ("Pendente", "Pago", ...), so serde and `Display` both use
//! the Portuguese wire names.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// The happy path is Pendente → Pago → Enviado → Entregue. Cancelado and
/// Devolvido branch off the active states; the lifecycle is not strictly
/// linear (an order can be walked back from Enviado to Pago, for example,
/// when a shipment is aborted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Awaiting payment confirmation.
    #[default]
    Pendente,
    /// Payment confirmed.
    Pago,
    /// Shipped to the carrier.
    Enviado,
    /// Delivered to the customer.
    Entregue,
    /// Cancelled before delivery.
    Cancelado,
    /// Returned by the customer.
    Devolvido,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pendente,
        Self::Pago,
        Self::Enviado,
        Self::Entregue,
        Self::Cancelado,
        Self::Devolvido,
    ];

    /// Whether the admin panel offers cancellation for this status.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        !matches!(self, Self::Cancelado | Self::Entregue | Self::Devolvido)
    }

    /// Whether the order counts toward revenue.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Pago | Self::Enviado | Self::Entregue)
    }

    /// Whether `self → to` is a valid lifecycle transition.
    #[must_use]
    pub const fn can_transition_to(&self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pendente, Self::Pago | Self::Cancelado)
                | (Self::Pago, Self::Pendente | Self::Enviado | Self::Cancelado)
                | (
                    Self::Enviado,
                    Self::Pago | Self::Entregue | Self::Cancelado | Self::Devolvido
                )
                | (Self::Entregue, Self::Devolvido)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pendente => "Pendente",
            Self::Pago => "Pago",
            Self::Enviado => "Enviado",
            Self::Entregue => "Entregue",
            Self::Cancelado => "Cancelado",
            Self::Devolvido => "Devolvido",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendente" => Ok(Self::Pendente),
            "Pago" => Ok(Self::Pago),
            "Enviado" => Ok(Self::Enviado),
            "Entregue" => Ok(Self::Entregue),
            "Cancelado" => Ok(Self::Cancelado),
            "Devolvido" => Ok(Self::Devolvido),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Payment method collected at checkout.
///
/// The payment step collects these but never transmits card data anywhere;
/// there is no gateway integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cartao,
    Pix,
    Boleto,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Cartao => "cartao",
            Self::Pix => "pix",
            Self::Boleto => "boleto",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cartao" => Ok(Self::Cartao),
            "pix" => Ok(Self::Pix),
            "boleto" => Ok(Self::Boleto),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Fixed product category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Lingerie,
    Conjuntos,
    Camisolas,
    Bodies,
    Acessorios,
    Cosmeticos,
}

impl ProductCategory {
    /// All categories, in display order.
    pub const ALL: [Self; 6] = [
        Self::Lingerie,
        Self::Conjuntos,
        Self::Camisolas,
        Self::Bodies,
        Self::Acessorios,
        Self::Cosmeticos,
    ];

    /// Display label shown in the shop.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Lingerie => "Lingerie",
            Self::Conjuntos => "Conjuntos",
            Self::Camisolas => "Camisolas",
            Self::Bodies => "Bodies",
            Self::Acessorios => "Acessórios",
            Self::Cosmeticos => "Cosméticos",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Lingerie => "lingerie",
            Self::Conjuntos => "conjuntos",
            Self::Camisolas => "camisolas",
            Self::Bodies => "bodies",
            Self::Acessorios => "acessorios",
            Self::Cosmeticos => "cosmeticos",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lingerie" => Ok(Self::Lingerie),
            "conjuntos" => Ok(Self::Conjuntos),
            "camisolas" => Ok(Self::Camisolas),
            "bodies" => Ok(Self::Bodies),
            "acessorios" => Ok(Self::Acessorios),
            "cosmeticos" => Ok(Self::Cosmeticos),
            _ => Err(format!("invalid product category: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_are_valid() {
        assert!(OrderStatus::Pendente.can_transition_to(OrderStatus::Pago));
        assert!(OrderStatus::Pago.can_transition_to(OrderStatus::Enviado));
        assert!(OrderStatus::Enviado.can_transition_to(OrderStatus::Entregue));
    }

    #[test]
    fn shipped_orders_can_be_walked_back() {
        assert!(OrderStatus::Enviado.can_transition_to(OrderStatus::Pago));
        assert!(OrderStatus::Pago.can_transition_to(OrderStatus::Pendente));
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        for to in OrderStatus::ALL {
            assert!(!OrderStatus::Cancelado.can_transition_to(to));
            assert!(!OrderStatus::Devolvido.can_transition_to(to));
        }
    }

    #[test]
    fn cancellation_gate_matches_admin_panel() {
        assert!(OrderStatus::Pendente.is_cancellable());
        assert!(OrderStatus::Pago.is_cancellable());
        assert!(OrderStatus::Enviado.is_cancellable());
        assert!(!OrderStatus::Entregue.is_cancellable());
        assert!(!OrderStatus::Cancelado.is_cancellable());
        assert!(!OrderStatus::Devolvido.is_cancellable());
    }

    #[test]
    fn status_roundtrips_through_portuguese_names() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.to_string().parse().expect("roundtrip");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn settled_statuses_count_toward_revenue() {
        assert!(!OrderStatus::Pendente.is_settled());
        assert!(OrderStatus::Pago.is_settled());
        assert!(OrderStatus::Enviado.is_settled());
        assert!(OrderStatus::Entregue.is_settled());
        assert!(!OrderStatus::Cancelado.is_settled());
        assert!(!OrderStatus::Devolvido.is_settled());
    }
}
