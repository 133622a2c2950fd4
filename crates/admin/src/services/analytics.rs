//! Sales analytics over the order book.
//!
//! All figures are computed from the real orders table. Revenue counts
//! settled orders only (Pago, Enviado, Entregue); cancelled, returned and
//! still-pending orders appear in the status breakdown but never in
//! revenue. The aggregation itself is pure so it can be tested without a
//! database.

use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;
use sqlx::PgPool;

use dona_onca_core::order::Order;
use dona_onca_core::{OrderStatus, Price, ProductId};

use crate::db::RepositoryError;
use crate::db::orders::AdminOrderRepository;

/// Top-line dashboard figures.
#[derive(Debug, Serialize)]
pub struct Summary {
    /// Revenue over settled orders.
    pub revenue: Price,
    /// Number of settled orders.
    pub settled_orders: usize,
    /// Average settled order value.
    pub average_order: Price,
    /// Order counts per lifecycle status, in lifecycle order.
    pub by_status: Vec<StatusCount>,
}

/// Orders in one lifecycle status.
#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// Revenue for one calendar month.
#[derive(Debug, Serialize)]
pub struct MonthlyRevenue {
    /// Month in `YYYY-MM` form.
    pub month: String,
    pub revenue: Price,
    pub orders: usize,
}

/// A product ranked by units sold.
#[derive(Debug, Serialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub revenue: Price,
}

/// Analytics service over the shared orders table.
pub struct AnalyticsService<'a> {
    orders: AdminOrderRepository<'a>,
}

impl<'a> AnalyticsService<'a> {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: AdminOrderRepository::new(pool),
        }
    }

    /// Dashboard summary figures.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the order query fails.
    pub async fn summary(&self) -> Result<Summary, RepositoryError> {
        Ok(summarize(&self.orders.list(None).await?))
    }

    /// Monthly revenue series, oldest month first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the order query fails.
    pub async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, RepositoryError> {
        Ok(monthly_series(&self.orders.list(None).await?))
    }

    /// Best-selling products by units across settled orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the order query fails.
    pub async fn top_products(&self, limit: usize) -> Result<Vec<TopProduct>, RepositoryError> {
        Ok(rank_products(&self.orders.list(None).await?, limit))
    }
}

fn summarize(orders: &[Order]) -> Summary {
    let mut revenue = Price::ZERO;
    let mut settled_orders = 0usize;
    let mut counts: HashMap<OrderStatus, usize> = HashMap::new();

    for order in orders {
        *counts.entry(order.status).or_default() += 1;
        if order.status.is_settled() {
            revenue += order.total;
            settled_orders += 1;
        }
    }

    let average_order = if settled_orders == 0 {
        Price::ZERO
    } else {
        Price::new(
            revenue.amount()
                / rust_decimal::Decimal::from(u64::try_from(settled_orders).unwrap_or(u64::MAX)),
        )
    };

    let by_status = OrderStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: counts.get(&status).copied().unwrap_or(0),
        })
        .collect();

    Summary {
        revenue,
        settled_orders,
        average_order,
        by_status,
    }
}

fn monthly_series(orders: &[Order]) -> Vec<MonthlyRevenue> {
    let mut months: HashMap<String, (Price, usize)> = HashMap::new();

    for order in orders {
        if !order.status.is_settled() {
            continue;
        }
        let key = format!(
            "{:04}-{:02}",
            order.created_at.year(),
            order.created_at.month()
        );
        let entry = months.entry(key).or_insert((Price::ZERO, 0));
        entry.0 += order.total;
        entry.1 += 1;
    }

    let mut series: Vec<MonthlyRevenue> = months
        .into_iter()
        .map(|(month, (revenue, orders))| MonthlyRevenue {
            month,
            revenue,
            orders,
        })
        .collect();
    series.sort_by(|a, b| a.month.cmp(&b.month));
    series
}

fn rank_products(orders: &[Order], limit: usize) -> Vec<TopProduct> {
    let mut totals: HashMap<ProductId, (String, u32, Price)> = HashMap::new();

    for order in orders {
        if !order.status.is_settled() {
            continue;
        }
        for item in &order.items {
            let entry = totals
                .entry(item.product_id)
                .or_insert_with(|| (item.name.clone(), 0, Price::ZERO));
            entry.1 += item.quantity;
            entry.2 += item.line_total();
        }
    }

    let mut ranked: Vec<TopProduct> = totals
        .into_iter()
        .map(|(product_id, (name, quantity, revenue))| TopProduct {
            product_id,
            name,
            quantity,
            revenue,
        })
        .collect();
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dona_onca_core::order::{OrderItem, ShippingAddress};
    use dona_onca_core::{OrderId, PaymentMethod, UserId};

    fn order(status: OrderStatus, total_centavos: i64, month: u32) -> Order {
        Order {
            id: OrderId::generate(),
            user_id: UserId::new(1),
            items: vec![],
            address: ShippingAddress {
                recipient: "Ana".to_string(),
                street: "Rua A".to_string(),
                number: "1".to_string(),
                complement: None,
                neighborhood: "Centro".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                cep: "01001-000".to_string(),
            },
            subtotal: Price::from_centavos(total_centavos),
            shipping: Price::ZERO,
            total: Price::from_centavos(total_centavos),
            payment_method: PaymentMethod::Pix,
            status,
            stock_deducted_at: None,
            created_at: Utc.with_ymd_and_hms(2026, month, 15, 12, 0, 0).unwrap(),
        }
    }

    fn with_items(mut base: Order, items: Vec<(i32, &str, u32, i64)>) -> Order {
        base.items = items
            .into_iter()
            .map(|(id, name, quantity, unit)| OrderItem {
                product_id: ProductId::new(id),
                name: name.to_string(),
                size: "Único".to_string(),
                color: "Único".to_string(),
                quantity,
                unit_price: Price::from_centavos(unit),
            })
            .collect();
        base
    }

    #[test]
    fn revenue_counts_only_settled_orders() {
        let orders = vec![
            order(OrderStatus::Pago, 10000, 1),
            order(OrderStatus::Enviado, 20000, 1),
            order(OrderStatus::Pendente, 99900, 1),
            order(OrderStatus::Cancelado, 50000, 1),
        ];

        let summary = summarize(&orders);
        assert_eq!(summary.revenue, Price::from_centavos(30000));
        assert_eq!(summary.settled_orders, 2);
        assert_eq!(summary.average_order, Price::from_centavos(15000));
    }

    #[test]
    fn status_breakdown_lists_every_status() {
        let summary = summarize(&[order(OrderStatus::Pago, 10000, 1)]);
        assert_eq!(summary.by_status.len(), OrderStatus::ALL.len());
        let pago = summary
            .by_status
            .iter()
            .find(|c| c.status == OrderStatus::Pago)
            .unwrap();
        assert_eq!(pago.count, 1);
    }

    #[test]
    fn monthly_series_is_sorted_and_skips_unsettled() {
        let orders = vec![
            order(OrderStatus::Pago, 10000, 3),
            order(OrderStatus::Entregue, 5000, 1),
            order(OrderStatus::Pendente, 70000, 2),
        ];

        let series = monthly_series(&orders);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month, "2026-01");
        assert_eq!(series[0].revenue, Price::from_centavos(5000));
        assert_eq!(series[1].month, "2026-03");
    }

    #[test]
    fn top_products_rank_by_units() {
        let orders = vec![
            with_items(
                order(OrderStatus::Pago, 0, 1),
                vec![(1, "Body Renda", 3, 8000), (2, "Camisola", 1, 12000)],
            ),
            with_items(
                order(OrderStatus::Entregue, 0, 2),
                vec![(2, "Camisola", 4, 12000)],
            ),
            with_items(
                order(OrderStatus::Cancelado, 0, 2),
                vec![(1, "Body Renda", 50, 8000)],
            ),
        ];

        let ranked = rank_products(&orders, 10);
        assert_eq!(ranked[0].product_id, ProductId::new(2));
        assert_eq!(ranked[0].quantity, 5);
        assert_eq!(ranked[0].revenue, Price::from_centavos(60000));
        assert_eq!(ranked[1].quantity, 3);
    }

    #[test]
    fn empty_order_book_yields_zeroes() {
        let summary = summarize(&[]);
        assert_eq!(summary.revenue, Price::ZERO);
        assert_eq!(summary.average_order, Price::ZERO);
        assert!(monthly_series(&[]).is_empty());
        assert!(rank_products(&[], 5).is_empty());
    }
}
