//! Checkout finalization.
//!
//! Turns a session cart plus a completed checkout wizard into a
//! persisted order. Stock for every line is deducted atomically by the
//! order store; if any line lacks stock the whole order is rejected and
//! the cart is left untouched.

use dona_onca_core::cart::{Cart, ShippingConfig};
use dona_onca_core::checkout::CheckoutWizard;
use dona_onca_core::order::{NewOrder, Order, OrderItem};
use dona_onca_core::store::OrderStore;
use dona_onca_core::UserId;

use crate::error::AppError;

/// Checkout finalization service, generic over the order store.
pub struct CheckoutService<'a, O> {
    orders: &'a O,
}

impl<'a, O: OrderStore> CheckoutService<'a, O> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(orders: &'a O) -> Self {
        Self { orders }
    }

    /// Finalize a checkout: create the order and deduct stock for every
    /// cart line in a single atomic operation.
    ///
    /// Totals are computed from the cart at this moment, so a shipping
    /// config change mid-checkout is picked up here.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the cart is empty.
    /// Returns `AppError::Checkout` if any wizard step is missing.
    /// Returns `AppError::Store` if a line has insufficient stock or the
    /// store fails.
    pub async fn finalize(
        &self,
        user_id: UserId,
        cart: &Cart,
        wizard: CheckoutWizard,
        shipping_config: &ShippingConfig,
    ) -> Result<Order, AppError> {
        if cart.is_empty() {
            return Err(AppError::BadRequest(
                "O carrinho está vazio.".to_string(),
            ));
        }

        let (_buyer, address, payment_method) = wizard.into_parts()?;

        let items: Vec<OrderItem> = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                name: line.product_name.clone(),
                size: line.size.clone(),
                color: line.color.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        let order = self
            .orders
            .create(NewOrder {
                user_id,
                items,
                address,
                subtotal: cart.subtotal(),
                shipping: cart.shipping(shipping_config),
                total: cart.total(shipping_config),
                payment_method,
                deduct_stock: true,
            })
            .await?;

        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use dona_onca_core::cart::{AddItem, SenderInfo};
    use dona_onca_core::checkout::BuyerInfo;
    use dona_onca_core::order::ShippingAddress;
    use dona_onca_core::store::{MemoryStore, StoreError};
    use dona_onca_core::{Email, PaymentMethod, Price, Product, ProductId};

    fn product(id: i32, price_centavos: i64, stock: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Produto {id}"),
            description: String::new(),
            category: dona_onca_core::ProductCategory::Lingerie,
            price: Price::from_centavos(price_centavos),
            original_price: None,
            has_sizes: false,
            sizes: vec![],
            has_colors: false,
            colors: vec![],
            images: vec![],
            stock,
            low_stock_alert: 5,
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn shipping_config() -> ShippingConfig {
        ShippingConfig {
            flat_rate: Price::from_centavos(1990),
            free_above: Price::from_centavos(29900),
            sender: SenderInfo {
                name: "Dona Onça".into(),
                phone: String::new(),
                street: "Rua XV de Novembro".into(),
                number: "100".into(),
                complement: None,
                neighborhood: "Centro".into(),
                city: "Curitiba".into(),
                state: "PR".into(),
                cep: "80020-310".into(),
            },
        }
    }

    fn complete_wizard() -> CheckoutWizard {
        let mut wizard = CheckoutWizard::new();
        wizard
            .submit_buyer(BuyerInfo {
                full_name: "Maria Silva".into(),
                email: Email::parse("maria@example.com").unwrap(),
                phone: "+55 41 98888-7777".into(),
            })
            .unwrap();
        wizard
            .submit_address(ShippingAddress {
                recipient: "Maria Silva".into(),
                street: "Avenida Paulista".into(),
                number: "1000".into(),
                complement: None,
                neighborhood: "Bela Vista".into(),
                city: "São Paulo".into(),
                state: "SP".into(),
                cep: "01310-100".into(),
            })
            .unwrap();
        wizard.submit_payment(PaymentMethod::Pix).unwrap();
        wizard
    }

    #[tokio::test]
    async fn finalize_creates_order_and_deducts_stock() {
        let store = MemoryStore::with_products(vec![product(1, 8000, 5), product(2, 2500, 3)]);

        let mut cart = Cart::new();
        cart.add_item(AddItem::from_product(&product(1, 8000, 5), Some("M".into()), Some("Preto".into()), 1));
        cart.add_item(AddItem::from_product(&product(2, 2500, 3), None, None, 2));

        let service = CheckoutService::new(&store);
        let order = service
            .finalize(UserId::new(7), &cart, complete_wizard(), &shipping_config())
            .await
            .unwrap();

        assert_eq!(order.subtotal, Price::from_centavos(13000));
        assert_eq!(order.total, Price::from_centavos(13000 + 1990));
        assert!(order.stock_deducted_at.is_some());
        assert_eq!(store.stock_of(ProductId::new(1)), Some(4));
        assert_eq!(store.stock_of(ProductId::new(2)), Some(1));
    }

    #[tokio::test]
    async fn finalize_rejects_insufficient_stock_without_partial_deduction() {
        let store = MemoryStore::with_products(vec![product(1, 8000, 5), product(2, 2500, 1)]);

        let mut cart = Cart::new();
        cart.add_item(AddItem::from_product(&product(1, 8000, 5), Some("M".into()), Some("Preto".into()), 1));
        cart.add_item(AddItem::from_product(&product(2, 2500, 1), None, None, 2));

        let service = CheckoutService::new(&store);
        let err = service
            .finalize(UserId::new(7), &cart, complete_wizard(), &shipping_config())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Store(StoreError::InsufficientStock { .. })
        ));
        // No line was deducted.
        assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
        assert_eq!(store.stock_of(ProductId::new(2)), Some(1));
    }

    #[tokio::test]
    async fn finalize_rejects_empty_cart() {
        let store = MemoryStore::new();
        let service = CheckoutService::new(&store);

        let err = service
            .finalize(
                UserId::new(7),
                &Cart::new(),
                complete_wizard(),
                &shipping_config(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn free_shipping_above_threshold() {
        let store = MemoryStore::with_products(vec![product(1, 30000, 5)]);

        let mut cart = Cart::new();
        cart.add_item(AddItem::from_product(&product(1, 30000, 5), Some("M".into()), Some("Preto".into()), 1));

        let service = CheckoutService::new(&store);
        let order = service
            .finalize(UserId::new(7), &cart, complete_wizard(), &shipping_config())
            .await
            .unwrap();

        assert_eq!(order.shipping, Price::ZERO);
        assert_eq!(order.total, Price::from_centavos(30000));
        assert_eq!(store.stock_of(ProductId::new(1)), Some(4));
    }
}
