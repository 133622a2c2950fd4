//! Checkout wizard state machine.
//!
//! Three user-driven steps (buyer info → address → payment), with "Voltar"
//! allowed between them. Finalization is only possible once every step has
//! been submitted; the wizard itself never touches stock or orders - the
//! checkout service does that against the stores.

use serde::{Deserialize, Serialize};

use crate::order::ShippingAddress;
use crate::types::{Email, PaymentMethod};

/// Buyer contact data collected in step 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuyerInfo {
    pub full_name: String,
    pub email: Email,
    pub phone: String,
}

/// The wizard's current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    BuyerInfo,
    Address,
    Payment,
}

/// Errors from wizard operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// A step was submitted out of order.
    #[error("step {submitted:?} submitted while on {current:?}")]
    WrongStep {
        current: CheckoutStep,
        submitted: CheckoutStep,
    },
    /// Finalization attempted before every step was completed.
    #[error("checkout is missing the {missing:?} step")]
    Incomplete { missing: CheckoutStep },
}

/// Session-resident checkout wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutWizard {
    step: CheckoutStep,
    buyer: Option<BuyerInfo>,
    address: Option<ShippingAddress>,
    payment: Option<PaymentMethod>,
}

impl CheckoutWizard {
    /// Start a fresh wizard at step 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The step the shopper is currently on.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn buyer(&self) -> Option<&BuyerInfo> {
        self.buyer.as_ref()
    }

    #[must_use]
    pub const fn address(&self) -> Option<&ShippingAddress> {
        self.address.as_ref()
    }

    #[must_use]
    pub const fn payment(&self) -> Option<PaymentMethod> {
        self.payment
    }

    /// Submit step 1 and advance to the address step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] if the wizard is not on step 1.
    pub fn submit_buyer(&mut self, buyer: BuyerInfo) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::BuyerInfo {
            return Err(CheckoutError::WrongStep {
                current: self.step,
                submitted: CheckoutStep::BuyerInfo,
            });
        }
        self.buyer = Some(buyer);
        self.step = CheckoutStep::Address;
        Ok(())
    }

    /// Submit step 2 and advance to the payment step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] if the wizard is not on step 2.
    pub fn submit_address(&mut self, address: ShippingAddress) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Address {
            return Err(CheckoutError::WrongStep {
                current: self.step,
                submitted: CheckoutStep::Address,
            });
        }
        self.address = Some(address);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Submit step 3. The wizard stays on the payment step; the order is
    /// placed by the checkout service via [`CheckoutWizard::into_parts`].
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] if the wizard is not on step 3.
    pub fn submit_payment(&mut self, payment: PaymentMethod) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep {
                current: self.step,
                submitted: CheckoutStep::Payment,
            });
        }
        self.payment = Some(payment);
        Ok(())
    }

    /// Go back one step ("Voltar"). Collected data is kept so stepping
    /// forward again pre-fills the form.
    pub fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::BuyerInfo | CheckoutStep::Address => CheckoutStep::BuyerInfo,
            CheckoutStep::Payment => CheckoutStep::Address,
        };
    }

    /// Whether every step has been submitted.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.buyer.is_some() && self.address.is_some() && self.payment.is_some()
    }

    /// Consume the wizard into its collected parts for order creation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Incomplete`] naming the first missing step.
    pub fn into_parts(
        self,
    ) -> Result<(BuyerInfo, ShippingAddress, PaymentMethod), CheckoutError> {
        let buyer = self.buyer.ok_or(CheckoutError::Incomplete {
            missing: CheckoutStep::BuyerInfo,
        })?;
        let address = self.address.ok_or(CheckoutError::Incomplete {
            missing: CheckoutStep::Address,
        })?;
        let payment = self.payment.ok_or(CheckoutError::Incomplete {
            missing: CheckoutStep::Payment,
        })?;
        Ok((buyer, address, payment))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn buyer() -> BuyerInfo {
        BuyerInfo {
            full_name: "Maria Silva".into(),
            email: Email::parse("maria@example.com").unwrap(),
            phone: "+55 41 98888-7777".into(),
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            recipient: "Maria Silva".into(),
            street: "Rua das Flores".into(),
            number: "45".into(),
            complement: None,
            neighborhood: "Centro".into(),
            city: "Curitiba".into(),
            state: "PR".into(),
            cep: "80010-000".into(),
        }
    }

    #[test]
    fn walks_the_three_steps_in_order() {
        let mut wizard = CheckoutWizard::new();
        assert_eq!(wizard.step(), CheckoutStep::BuyerInfo);

        wizard.submit_buyer(buyer()).unwrap();
        assert_eq!(wizard.step(), CheckoutStep::Address);

        wizard.submit_address(address()).unwrap();
        assert_eq!(wizard.step(), CheckoutStep::Payment);

        wizard.submit_payment(PaymentMethod::Pix).unwrap();
        assert!(wizard.is_complete());

        let (b, a, p) = wizard.into_parts().unwrap();
        assert_eq!(b, buyer());
        assert_eq!(a, address());
        assert_eq!(p, PaymentMethod::Pix);
    }

    #[test]
    fn rejects_out_of_order_submission() {
        let mut wizard = CheckoutWizard::new();
        let err = wizard.submit_address(address()).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::WrongStep {
                current: CheckoutStep::BuyerInfo,
                submitted: CheckoutStep::Address,
            }
        );
    }

    #[test]
    fn back_keeps_collected_data() {
        let mut wizard = CheckoutWizard::new();
        wizard.submit_buyer(buyer()).unwrap();
        wizard.submit_address(address()).unwrap();
        wizard.back();
        assert_eq!(wizard.step(), CheckoutStep::Address);
        assert!(wizard.buyer().is_some());
        assert!(wizard.address().is_some());

        wizard.back();
        assert_eq!(wizard.step(), CheckoutStep::BuyerInfo);
        // Back from step 1 stays on step 1
        wizard.back();
        assert_eq!(wizard.step(), CheckoutStep::BuyerInfo);
    }

    #[test]
    fn incomplete_wizard_names_missing_step() {
        let mut wizard = CheckoutWizard::new();
        wizard.submit_buyer(buyer()).unwrap();
        let err = wizard.into_parts().unwrap_err();
        assert_eq!(
            err,
            CheckoutError::Incomplete {
                missing: CheckoutStep::Address,
            }
        );
    }
}
