//! Shop API integration: carts and order creation.
//!
//! # Architecture
//!
//! - The shop API is the source of truth for carts, totals and orders.
//!   The storefront never computes totals or persists orders itself.
//! - Handlers talk to it through the [`OrderBackend`] trait so the checkout
//!   flow can be exercised without a live API.
//! - [`ShopApiClient`] is the production implementation (JSON over HTTP).
//!
//! # Example
//!
//! ```rust,ignore
//! use teslo_storefront::shop::{OrderBackend, ShopApiClient};
//!
//! let client = ShopApiClient::new(&config.shop)?;
//! let cart = client.cart_snapshot(&cart_id).await?;
//! let order_id = client.create_order(&NewOrder::from_cart(&cart, &address)).await?;
//! ```

mod client;

pub use client::ShopApiClient;

use async_trait::async_trait;
use teslo_core::{CartId, CartSnapshot, NewOrder, OrderId};
use thiserror::Error;

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum ShopApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the shop API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Client could not be configured.
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Why an order was not created.
///
/// Replaces a `{ hasError, message }` pair where `message` was either an
/// error or the new order ID depending on the flag.
#[derive(Debug, Error)]
pub enum OrderRejection {
    /// The shop API refused the order and said why (e.g. "Card declined").
    #[error("order refused: {0}")]
    Refused(String),

    /// The shop API could not be reached or answered with something unreadable.
    #[error("order API unavailable: {0}")]
    Unavailable(#[source] ShopApiError),
}

impl OrderRejection {
    /// Shown when the shop API gave no usable reason.
    pub const FALLBACK_MESSAGE: &'static str = "Uncontrolled error, talk to the administrator";

    /// Message to show the customer next to the confirm button.
    #[must_use]
    pub fn customer_message(&self) -> &str {
        match self {
            Self::Refused(message) if !message.trim().is_empty() => message.as_str(),
            Self::Refused(_) | Self::Unavailable(_) => Self::FALLBACK_MESSAGE,
        }
    }
}

/// Cart and order operations the checkout depends on.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Fetch the current lines and totals of a cart.
    async fn cart_snapshot(&self, cart_id: &CartId) -> Result<CartSnapshot, ShopApiError>;

    /// Create an order; returns the ID the shop API assigned to it.
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, OrderRejection>;

    /// Fetch a cart, treating one the shop API no longer knows as empty.
    async fn cart_or_empty(&self, cart_id: &CartId) -> Result<CartSnapshot, ShopApiError> {
        match self.cart_snapshot(cart_id).await {
            Err(ShopApiError::NotFound(_)) => {
                tracing::warn!(cart_id = %cart_id, "Cart in session no longer exists");
                Ok(CartSnapshot::default())
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refused_message_is_shown_verbatim() {
        let rejection = OrderRejection::Refused("Card declined".to_string());
        assert_eq!(rejection.customer_message(), "Card declined");
    }

    #[test]
    fn test_blank_refusal_uses_fallback() {
        let rejection = OrderRejection::Refused("  ".to_string());
        assert_eq!(
            rejection.customer_message(),
            OrderRejection::FALLBACK_MESSAGE
        );
    }

    #[test]
    fn test_unavailable_hides_internal_details() {
        let rejection = OrderRejection::Unavailable(ShopApiError::Api {
            status: 502,
            message: "upstream connect error".to_string(),
        });
        assert_eq!(
            rejection.customer_message(),
            OrderRejection::FALLBACK_MESSAGE
        );
        assert!(rejection.to_string().contains("upstream connect error"));
    }

    #[test]
    fn test_rate_limited_display() {
        let err = ShopApiError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
