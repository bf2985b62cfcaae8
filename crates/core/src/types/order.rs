//! Cart snapshots, order summaries and the new-order payload.
//!
//! The shop API owns cart totals; these types only carry what it computed.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, ShippingAddress};

/// One line of the cart under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product the line refers to.
    #[serde(rename = "_id")]
    pub product_id: ProductId,
    /// Product title.
    pub title: String,
    /// URL slug of the product page.
    pub slug: String,
    /// Selected size, for sized products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Primary image file name or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price.
    pub price: Price,
}

impl CartLine {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Aggregated cart metrics shown at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Total units across all lines.
    pub number_of_items: u32,
    /// Sum of line totals before tax.
    pub sub_total: Price,
    /// Tax charged on the order.
    pub tax: Price,
    /// Amount the customer pays.
    pub total: Price,
}

impl OrderSummary {
    /// Whether there is nothing to order.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.number_of_items == 0
    }

    /// "product" for a single item, "products" otherwise.
    #[must_use]
    pub const fn item_label(&self) -> &'static str {
        if self.number_of_items > 1 {
            "products"
        } else {
            "product"
        }
    }
}

/// The cart as the shop API currently sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Cart lines in display order.
    #[serde(default)]
    pub lines: Vec<CartLine>,
    /// Totals computed by the cart module.
    #[serde(default)]
    pub summary: OrderSummary,
}

/// Payload for creating an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_items: Vec<CartLine>,
    pub shipping_address: ShippingAddress,
    pub number_of_items: u32,
    pub sub_total: Price,
    pub tax: Price,
    pub total: Price,
    /// Orders are always created unpaid; payment happens on the order page.
    pub is_paid: bool,
}

impl NewOrder {
    /// Build an unpaid order from a cart snapshot and a delivery address.
    #[must_use]
    pub fn from_cart(cart: &CartSnapshot, shipping_address: &ShippingAddress) -> Self {
        Self {
            order_items: cart.lines.clone(),
            shipping_address: shipping_address.clone(),
            number_of_items: cart.summary.number_of_items,
            sub_total: cart.summary.sub_total,
            tax: cart.summary.tax,
            total: cart.summary.total,
            is_paid: false,
        }
    }
}
