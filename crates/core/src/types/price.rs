//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::ops::Mul;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency.
///
/// Serialized as a decimal string (e.g. `"19.90"`) so no precision is lost
/// on the way to and from the shop API.
///
/// ```
/// use rust_decimal::Decimal;
/// use teslo_core::Price;
///
/// let price = Price::new(Decimal::new(1999, 2));
/// assert_eq!(price.to_string(), "$19.99");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::new(Decimal::new(5, 0)).to_string(), "$5.00");
        assert_eq!(Price::new(Decimal::new(1234, 1)).to_string(), "$123.40");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_display_rounds_sub_cent_amounts() {
        assert_eq!(Price::new(Decimal::new(10_006, 3)).to_string(), "$10.01");
    }

    #[test]
    fn test_multiply_by_quantity() {
        let unit = Price::new(Decimal::new(250, 2));
        assert_eq!(unit * 3, Price::new(Decimal::new(750, 2)));
    }
}
