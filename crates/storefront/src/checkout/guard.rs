//! Address guard for the order summary page.

use axum::response::Redirect;
use teslo_core::ShippingAddress;

use super::CheckoutSession;

/// Page that collects the shipping address.
pub const ADDRESS_ROUTE: &str = "/checkout/address";

/// Require a deliverable shipping address before showing the summary.
///
/// # Errors
///
/// Returns a redirect to [`ADDRESS_ROUTE`] when no address is stored or its
/// primary line is empty. The caller should render nothing else.
pub fn require_address(checkout: &CheckoutSession) -> Result<&ShippingAddress, Redirect> {
    checkout.deliverable_address().ok_or_else(|| {
        tracing::debug!("No deliverable shipping address, redirecting to address page");
        Redirect::to(ADDRESS_ROUTE)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::{StatusCode, header::LOCATION};
    use axum::response::IntoResponse;
    use tower_sessions::{MemoryStore, Session};

    use super::*;

    async fn checkout_with(address: Option<&str>) -> CheckoutSession {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut checkout = CheckoutSession::load(session).await.unwrap();
        if let Some(line) = address {
            checkout
                .set_shipping_address(ShippingAddress {
                    address: line.to_string(),
                    ..ShippingAddress::default()
                })
                .await
                .unwrap();
        }
        checkout
    }

    fn assert_redirects_to_address(redirect: Redirect) {
        let response = redirect.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), ADDRESS_ROUTE);
    }

    #[tokio::test]
    async fn test_missing_address_redirects() {
        let checkout = checkout_with(None).await;
        assert_redirects_to_address(require_address(&checkout).unwrap_err());
    }

    #[tokio::test]
    async fn test_empty_primary_line_redirects() {
        let checkout = checkout_with(Some("")).await;
        assert_redirects_to_address(require_address(&checkout).unwrap_err());
    }

    #[tokio::test]
    async fn test_deliverable_address_passes() {
        let checkout = checkout_with(Some("742 Evergreen Terrace")).await;
        let address = require_address(&checkout).unwrap();
        assert_eq!(address.address, "742 Evergreen Terrace");
    }
}
