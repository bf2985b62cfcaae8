//! Checkout summary route handlers.
//!
//! `GET` renders the order review page behind the address guard; `POST`
//! confirms the order through the [`SubmissionController`].
//!
//! [`SubmissionController`]: crate::checkout::SubmissionController

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use teslo_core::{CartLine, CartSnapshot, OrderId, OrderSummary, ShippingAddress};
use tracing::instrument;

use crate::checkout::{CheckoutSession, Placement, require_address};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Route of the order summary page.
pub const SUMMARY_ROUTE: &str = "/checkout/summary";

/// Body of the response to a duplicate confirm while an order is being placed.
pub const ALREADY_POSTING_MESSAGE: &str = "Your order is already being placed";

/// Body of the response to a confirm for a cart that already became an order.
pub const ALREADY_PLACED_MESSAGE: &str = "This order has already been placed";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub title: String,
    pub slug: String,
    pub size: Option<String>,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            title: line.title.clone(),
            slug: line.slug.clone(),
            size: line.size.clone(),
            image_url: line.image.as_deref().map(product_image_url),
            quantity: line.quantity,
            price: line.price.to_string(),
            line_price: line.line_total().to_string(),
        }
    }
}

/// Shipping address display data for templates.
#[derive(Clone)]
pub struct AddressView {
    pub full_name: String,
    pub street: String,
    pub city_line: String,
    pub country: String,
    pub phone: String,
}

impl From<&ShippingAddress> for AddressView {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            full_name: address.full_name(),
            street: address.street_line(),
            city_line: address.city_line(),
            country: address.country_name().to_string(),
            phone: address.phone.clone(),
        }
    }
}

/// Order totals display data for templates.
#[derive(Clone)]
pub struct TotalsView {
    pub item_count: u32,
    pub item_label: &'static str,
    pub sub_total: String,
    pub tax: String,
    pub total: String,
}

impl From<&OrderSummary> for TotalsView {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            item_count: summary.number_of_items,
            item_label: summary.item_label(),
            sub_total: summary.sub_total.to_string(),
            tax: summary.tax.to_string(),
            total: summary.total.to_string(),
        }
    }
}

/// Order summary page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/summary.html")]
pub struct SummaryTemplate {
    pub lines: Vec<CartLineView>,
    pub address: AddressView,
    pub totals: TotalsView,
    /// Inline failure message from the last confirm attempt.
    pub error: Option<String>,
    /// Confirm button enabled.
    pub can_submit: bool,
    pub nonce: String,
}

impl SummaryTemplate {
    fn new(
        cart: &CartSnapshot,
        address: &ShippingAddress,
        posting: bool,
        error: Option<String>,
        nonce: String,
    ) -> Self {
        Self {
            lines: cart.lines.iter().map(CartLineView::from).collect(),
            address: AddressView::from(address),
            totals: TotalsView::from(&cart.summary),
            error,
            can_submit: !posting && !cart.summary.is_empty(),
            nonce,
        }
    }
}

/// Product images are either absolute URLs or file names under `/products/`.
fn product_image_url(image: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        image.to_string()
    } else {
        format!("/products/{}", image.trim_start_matches('/'))
    }
}

/// Order confirmation page for a newly created order.
fn order_route(order_id: &OrderId) -> String {
    format!("/orders/{}", urlencoding::encode(order_id.as_str()))
}

/// Fetch the visitor's cart; no cart, or one the shop API forgot, is empty.
async fn load_cart(state: &AppState, checkout: &CheckoutSession) -> Result<CartSnapshot> {
    match checkout.cart_id() {
        Some(cart_id) => Ok(state.orders().cart_or_empty(cart_id).await?),
        None => Ok(CartSnapshot::default()),
    }
}

/// Display the order summary page.
///
/// Redirects to the address page when no deliverable address is stored.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    checkout: CheckoutSession,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let address = match require_address(&checkout) {
        Ok(address) => address,
        Err(redirect) => return Ok(redirect.into_response()),
    };

    let cart = load_cart(&state, &checkout).await?;
    let locked = checkout.cart_id().is_some_and(|cart_id| {
        state.submissions().is_posting(cart_id) || state.submissions().is_placed(cart_id)
    });

    Ok(SummaryTemplate::new(&cart, address, locked, None, nonce).into_response())
}

/// Confirm the order.
///
/// - Empty cart or missing address: back to the summary page, nothing sent.
/// - Already posting, or already placed from another tab: `409 Conflict`,
///   nothing sent.
/// - Created: cart detached from the session, redirect to `/orders/{id}`.
/// - Rejected: summary page re-rendered with the message inline.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    mut checkout: CheckoutSession,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let Some(cart_id) = checkout.cart_id().cloned() else {
        tracing::debug!("Confirm without a cart, ignoring");
        return Ok(Redirect::to(SUMMARY_ROUTE).into_response());
    };

    add_breadcrumb(
        "checkout",
        "Confirm order",
        Some(&[("cart_id", cart_id.as_str())]),
    );

    // The posting flag is claimed before the cart is fetched
    let placement = state
        .submissions()
        .place_order(state.orders(), &cart_id, checkout.shipping_address())
        .await?;

    match placement {
        Placement::Blocked(reason) => {
            tracing::debug!(?reason, "Order not submitted");
            Ok(Redirect::to(SUMMARY_ROUTE).into_response())
        }
        Placement::AlreadyPosting => {
            Ok((StatusCode::CONFLICT, ALREADY_POSTING_MESSAGE).into_response())
        }
        Placement::AlreadyPlaced => {
            Ok((StatusCode::CONFLICT, ALREADY_PLACED_MESSAGE).into_response())
        }
        Placement::Created(order_id) => {
            // The order exists either way; a session failure only leaves a
            // stale cart ID, which the placed marker already blocks
            if let Err(e) = checkout.complete_order().await {
                tracing::error!(error = %e, order_id = %order_id, "Failed to detach cart from session");
            }

            Ok(Redirect::to(&order_route(&order_id)).into_response())
        }
        Placement::Failed { rejection, cart } => {
            let address = match require_address(&checkout) {
                Ok(address) => address,
                Err(redirect) => return Ok(redirect.into_response()),
            };
            let message = rejection.customer_message().to_string();

            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                SummaryTemplate::new(&cart, address, false, Some(message), nonce),
            )
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_route_encodes_id() {
        assert_eq!(order_route(&OrderId::new("ABC123")), "/orders/ABC123");
        assert_eq!(order_route(&OrderId::new("a/b c")), "/orders/a%2Fb%20c");
    }

    #[test]
    fn test_product_image_url() {
        assert_eq!(
            product_image_url("1740176-00-A_0_2000.jpg"),
            "/products/1740176-00-A_0_2000.jpg"
        );
        assert_eq!(
            product_image_url("https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn test_summary_disables_confirm_when_empty_or_posting() {
        let address = ShippingAddress {
            address: "Calle 1".to_string(),
            ..ShippingAddress::default()
        };
        let mut cart = CartSnapshot::default();

        let page = SummaryTemplate::new(&cart, &address, false, None, String::new());
        assert!(!page.can_submit);

        cart.summary.number_of_items = 2;
        let page = SummaryTemplate::new(&cart, &address, false, None, String::new());
        assert!(page.can_submit);
        assert_eq!(page.totals.item_label, "products");

        let page = SummaryTemplate::new(&cart, &address, true, None, String::new());
        assert!(!page.can_submit);
    }
}
