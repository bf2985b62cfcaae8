//! Order submission controller.
//!
//! Guards the single "confirm order" action. Each cart has a posting flag
//! that is claimed before anything is awaited and released when the attempt
//! fails. A cart whose order was created is marked placed for the lifetime
//! of the process, so a request that still carries it in a stale session can
//! never reach the shop API again. There is no retry and no request
//! deduplication key beyond these markers.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use teslo_core::{CartId, CartSnapshot, NewOrder, OrderId, ShippingAddress};
use tracing::instrument;

use crate::shop::{OrderBackend, OrderRejection, ShopApiError};

/// Why a submission never reached the shop API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// The cart has no items.
    EmptyCart,
    /// No shipping address with a primary line.
    MissingAddress,
}

/// Result of a confirm-order attempt.
#[derive(Debug)]
pub enum Placement {
    /// Preconditions failed; nothing was sent.
    Blocked(Blocked),
    /// Another submission for this cart is still in flight; nothing was sent.
    AlreadyPosting,
    /// This cart already became an order; nothing was sent.
    AlreadyPlaced,
    /// The order exists and the cart is marked placed.
    Created(OrderId),
    /// The shop API rejected the order; the posting flag is already cleared.
    Failed {
        rejection: OrderRejection,
        /// Cart the order was built from, for re-rendering the summary.
        cart: CartSnapshot,
    },
}

/// Why a cart cannot be claimed for submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    Posting,
    Placed,
}

#[derive(Debug, Default)]
struct CartMarkers {
    posting: HashSet<CartId>,
    placed: HashSet<CartId>,
}

/// Tracks carts with an order in flight and carts already turned into orders.
#[derive(Clone, Default)]
pub struct SubmissionController {
    carts: Arc<Mutex<CartMarkers>>,
}

impl SubmissionController {
    /// Create a controller with no submissions in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an order for `cart_id` is being placed right now.
    #[must_use]
    pub fn is_posting(&self, cart_id: &CartId) -> bool {
        self.carts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .posting
            .contains(cart_id)
    }

    /// Whether `cart_id` has already become an order.
    #[must_use]
    pub fn is_placed(&self, cart_id: &CartId) -> bool {
        self.carts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .placed
            .contains(cart_id)
    }

    /// Set the posting flag for `cart_id`, unless it is posting or placed.
    fn begin(&self, cart_id: &CartId) -> Result<PostingGuard, Busy> {
        let mut carts = self.carts.lock().unwrap_or_else(PoisonError::into_inner);

        if carts.placed.contains(cart_id) {
            return Err(Busy::Placed);
        }
        if !carts.posting.insert(cart_id.clone()) {
            return Err(Busy::Posting);
        }

        Ok(PostingGuard {
            cart_id: cart_id.clone(),
            carts: Arc::clone(&self.carts),
            placed: false,
        })
    }

    /// Place an order for the cart `cart_id` delivered to `address`.
    ///
    /// The posting flag is claimed before the cart is fetched. Empty carts
    /// and missing addresses are silent no-ops. Otherwise the shop API is
    /// called once; the flag is cleared on failure and turned into a placed
    /// marker on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be fetched from the shop API.
    #[instrument(skip_all, fields(cart_id = %cart_id))]
    pub async fn place_order(
        &self,
        backend: &dyn OrderBackend,
        cart_id: &CartId,
        address: Option<&ShippingAddress>,
    ) -> Result<Placement, ShopApiError> {
        let Some(address) = address.filter(|a| a.is_deliverable()) else {
            tracing::debug!("No deliverable address, not submitting order");
            return Ok(Placement::Blocked(Blocked::MissingAddress));
        };

        let posting = match self.begin(cart_id) {
            Ok(posting) => posting,
            Err(Busy::Posting) => {
                tracing::debug!("Order submission already in flight");
                return Ok(Placement::AlreadyPosting);
            }
            Err(Busy::Placed) => {
                tracing::debug!("Cart already placed as an order");
                return Ok(Placement::AlreadyPlaced);
            }
        };

        let cart = backend.cart_or_empty(cart_id).await?;
        if cart.summary.is_empty() {
            tracing::debug!("Cart is empty, not submitting order");
            return Ok(Placement::Blocked(Blocked::EmptyCart));
        }

        let order = NewOrder::from_cart(&cart, address);

        match backend.create_order(&order).await {
            Ok(order_id) => {
                tracing::info!(order_id = %order_id, items = order.number_of_items, "Order created");
                posting.mark_placed();
                Ok(Placement::Created(order_id))
            }
            Err(rejection) => {
                tracing::warn!(error = %rejection, "Order creation failed");
                drop(posting);
                Ok(Placement::Failed { rejection, cart })
            }
        }
    }
}

/// Posting flag for one cart; cleared when dropped.
///
/// Dropping also happens when the request future is cancelled (client
/// disconnect), so an abandoned submission never blocks the cart.
#[derive(Debug)]
struct PostingGuard {
    cart_id: CartId,
    carts: Arc<Mutex<CartMarkers>>,
    placed: bool,
}

impl PostingGuard {
    /// Release the flag and remember the cart as placed.
    fn mark_placed(mut self) {
        self.placed = true;
    }
}

impl Drop for PostingGuard {
    fn drop(&mut self) {
        let mut carts = self.carts.lock().unwrap_or_else(PoisonError::into_inner);
        carts.posting.remove(&self.cart_id);
        if self.placed {
            carts.placed.insert(self.cart_id.clone());
        }
    }
}
