//! Session-backed checkout state.
//!
//! Cart ID and shipping address live in one tower-sessions record. Handlers
//! load them once per request through [`CheckoutSession`] and write through
//! its setters, so there is never a second copy to reconcile.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use teslo_core::{CartId, ShippingAddress};
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use crate::error::AppError;
use crate::models::session_keys;

/// Checkout state for the current visitor.
#[derive(Clone)]
pub struct CheckoutSession {
    session: Session,
    cart_id: Option<CartId>,
    shipping_address: Option<ShippingAddress>,
}

impl CheckoutSession {
    /// Load the checkout state from the session.
    ///
    /// A stored address that no longer deserializes is treated as missing so
    /// the customer is sent back to re-enter it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: Session) -> Result<Self, SessionError> {
        let cart_id = session.get::<CartId>(session_keys::CART_ID).await?;

        let shipping_address = match session
            .get::<ShippingAddress>(session_keys::CHECKOUT_ADDRESS)
            .await
        {
            Ok(address) => address,
            Err(SessionError::SerdeJson(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable checkout address");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            session,
            cart_id,
            shipping_address,
        })
    }

    /// Cart being checked out, if the visitor has one.
    #[must_use]
    pub const fn cart_id(&self) -> Option<&CartId> {
        self.cart_id.as_ref()
    }

    /// Stored shipping address, deliverable or not.
    #[must_use]
    pub const fn shipping_address(&self) -> Option<&ShippingAddress> {
        self.shipping_address.as_ref()
    }

    /// Stored shipping address, only if it has a primary line.
    #[must_use]
    pub fn deliverable_address(&self) -> Option<&ShippingAddress> {
        self.shipping_address
            .as_ref()
            .filter(|address| address.is_deliverable())
    }

    /// Replace the shipping address and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_shipping_address(
        &mut self,
        address: ShippingAddress,
    ) -> Result<(), SessionError> {
        self.session
            .insert(session_keys::CHECKOUT_ADDRESS, &address)
            .await?;
        self.shipping_address = Some(address);
        Ok(())
    }

    /// Associate a shop API cart with this visitor and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn attach_cart(&mut self, cart_id: CartId) -> Result<(), SessionError> {
        self.session.insert(session_keys::CART_ID, &cart_id).await?;
        self.cart_id = Some(cart_id);
        Ok(())
    }

    /// Forget the cart once it has become an order.
    ///
    /// The shipping address is kept for the next checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn complete_order(&mut self) -> Result<(), SessionError> {
        self.session
            .remove::<CartId>(session_keys::CART_ID)
            .await?;
        self.cart_id = None;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for CheckoutSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        Ok(Self::load(session).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn address(line: &str) -> ShippingAddress {
        ShippingAddress {
            first_name: "Ada".to_string(),
            address: line.to_string(),
            ..ShippingAddress::default()
        }
    }

    #[tokio::test]
    async fn test_empty_session_has_no_state() {
        let checkout = CheckoutSession::load(session()).await.unwrap();
        assert!(checkout.cart_id().is_none());
        assert!(checkout.shipping_address().is_none());
        assert!(checkout.deliverable_address().is_none());
    }

    #[tokio::test]
    async fn test_saved_state_is_visible_to_next_load() {
        let session = session();
        let mut checkout = CheckoutSession::load(session.clone()).await.unwrap();
        checkout.attach_cart(CartId::new("cart-1")).await.unwrap();
        checkout
            .set_shipping_address(address("Av. Reforma 222"))
            .await
            .unwrap();

        let reloaded = CheckoutSession::load(session).await.unwrap();
        assert_eq!(reloaded.cart_id().unwrap().as_str(), "cart-1");
        assert_eq!(
            reloaded.deliverable_address().unwrap().address,
            "Av. Reforma 222"
        );
    }

    #[tokio::test]
    async fn test_blank_primary_line_is_not_deliverable() {
        let mut checkout = CheckoutSession::load(session()).await.unwrap();
        checkout.set_shipping_address(address("")).await.unwrap();

        assert!(checkout.shipping_address().is_some());
        assert!(checkout.deliverable_address().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_address_is_treated_as_missing() {
        let session = session();
        session
            .insert(session_keys::CHECKOUT_ADDRESS, "not an address object")
            .await
            .unwrap();

        let checkout = CheckoutSession::load(session).await.unwrap();
        assert!(checkout.shipping_address().is_none());
    }

    #[tokio::test]
    async fn test_complete_order_keeps_address() {
        let session = session();
        let mut checkout = CheckoutSession::load(session.clone()).await.unwrap();
        checkout.attach_cart(CartId::new("cart-1")).await.unwrap();
        checkout
            .set_shipping_address(address("Calle 8"))
            .await
            .unwrap();

        checkout.complete_order().await.unwrap();

        let reloaded = CheckoutSession::load(session).await.unwrap();
        assert!(reloaded.cart_id().is_none());
        assert!(reloaded.deliverable_address().is_some());
    }
}
