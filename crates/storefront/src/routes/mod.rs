//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (session database)
//!
//! # Checkout
//! GET  /checkout/summary       - Order review (redirects to /checkout/address without an address)
//! POST /checkout/summary       - Confirm order (redirects to /orders/{id} on success)
//! ```
//!
//! `/checkout/address`, `/cart` and `/orders/{id}` are served by the pages
//! that own address collection, the cart and order display.

pub mod checkout;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/summary", get(checkout::show).post(checkout::submit))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/checkout", checkout_routes())
}
