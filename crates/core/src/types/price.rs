//! Type-safe price representation using decimal arithmetic.
//!
//! All prices in the shop are Brazilian reais (BRL). Amounts are held as
//! `rust_decimal::Decimal` in the currency's standard unit (reais, not
//! centavos), matching how the database stores them.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Brazilian reais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct Price(Decimal);

impl Price {
    /// A price of zero reais.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount in reais.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in centavos.
    ///
    /// ```
    /// use dona_onca_core::Price;
    ///
    /// let price = Price::from_centavos(4990);
    /// assert_eq!(price.display_brl(), "R$ 49,90");
    /// ```
    #[must_use]
    pub fn from_centavos(centavos: i64) -> Self {
        Self(Decimal::new(centavos, 2))
    }

    /// Get the decimal amount in reais.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display with Brazilian conventions ("R$ 49,90").
    #[must_use]
    pub fn display_brl(&self) -> String {
        // Decimal's Display honors precision; swap the separator afterwards.
        format!("R$ {:.2}", self.0).replace('.', ",")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_centavos_scales_correctly() {
        assert_eq!(Price::from_centavos(13000).amount(), Decimal::new(130, 0));
    }

    #[test]
    fn display_uses_comma_separator() {
        assert_eq!(Price::from_centavos(5000).display_brl(), "R$ 50,00");
        assert_eq!(Price::from_centavos(199990).display_brl(), "R$ 1999,90");
    }

    #[test]
    fn times_multiplies_by_quantity() {
        let line = Price::from_centavos(5000).times(2);
        assert_eq!(line, Price::from_centavos(10000));
    }

    #[test]
    fn sum_over_lines() {
        let total: Price = [Price::from_centavos(10000), Price::from_centavos(3000)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_centavos(13000));
    }
}
