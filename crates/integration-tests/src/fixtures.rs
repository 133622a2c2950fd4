//! Shared test fixtures.

use chrono::Utc;

use dona_onca_core::cart::{Cart, SenderInfo, ShippingConfig};
use dona_onca_core::checkout::{BuyerInfo, CheckoutWizard};
use dona_onca_core::order::{Order, ShippingAddress};
use dona_onca_core::product::Product;
use dona_onca_core::store::MemoryStore;
use dona_onca_core::{Email, PaymentMethod, Price, ProductCategory, ProductId, UserId};

use dona_onca_storefront::error::AppError;
use dona_onca_storefront::services::checkout::CheckoutService;

/// A catalog product with the given price (in centavos) and stock.
#[must_use]
pub fn product(id: i32, price_centavos: i64, stock: i32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Produto {id}"),
        description: String::new(),
        category: ProductCategory::Lingerie,
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
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// The launch shipping config: R$ 19,90 flat, free above R$ 299,00.
#[must_use]
pub fn shipping_config() -> ShippingConfig {
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

/// A wizard with every step already submitted.
///
/// # Panics
///
/// Panics if the wizard rejects a step, which a fresh wizard never does.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn complete_wizard() -> CheckoutWizard {
    let mut wizard = CheckoutWizard::new();
    wizard
        .submit_buyer(BuyerInfo {
            full_name: "Maria Silva".into(),
            email: Email::parse("maria@example.com").unwrap(),
            phone: "+55 41 98888-7777".into(),
        })
        .unwrap();
    wizard.submit_address(address()).unwrap();
    wizard.submit_payment(PaymentMethod::Pix).unwrap();
    wizard
}

/// A shipping address for orders built outside the wizard.
#[must_use]
pub fn address() -> ShippingAddress {
    ShippingAddress {
        recipient: "Maria Silva".into(),
        street: "Avenida Paulista".into(),
        number: "1000".into(),
        complement: None,
        neighborhood: "Bela Vista".into(),
        city: "São Paulo".into(),
        state: "SP".into(),
        cep: "01310-100".into(),
    }
}

/// A shopper's session: cart plus checkout state, the way the storefront
/// holds them between requests.
pub struct ShopSession {
    pub user_id: UserId,
    pub cart: Cart,
}

impl ShopSession {
    /// Start a session for a logged-in shopper.
    #[must_use]
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id: UserId::new(user_id),
            cart: Cart::new(),
        }
    }

    /// Finalize checkout the way the route does: place the order, and
    /// only on success replace the cart with an empty one.
    ///
    /// # Errors
    ///
    /// Propagates the checkout service error; the cart is kept on failure.
    pub async fn checkout(
        &mut self,
        store: &MemoryStore,
        config: &ShippingConfig,
    ) -> Result<Order, AppError> {
        let service = CheckoutService::new(store);
        let order = service
            .finalize(self.user_id, &self.cart, complete_wizard(), config)
            .await?;

        self.cart = Cart::new();
        Ok(order)
    }
}
