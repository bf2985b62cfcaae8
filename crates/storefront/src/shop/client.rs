//! HTTP client for the shop API.
//!
//! JSON over HTTP with a bearer token. Cart reads are plain `GET`s; orders
//! are created with a single `POST` and never retried.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use teslo_core::{CartId, CartSnapshot, NewOrder, OrderId};
use tracing::{debug, instrument};
use url::Url;

use super::{OrderBackend, OrderRejection, ShopApiError};
use crate::config::ShopApiConfig;

/// Characters of an error body kept in logs and error values.
const ERROR_BODY_PREVIEW: usize = 200;

/// Body of a successful order creation.
#[derive(Debug, Deserialize)]
struct CreatedOrder {
    #[serde(rename = "_id", alias = "id")]
    id: OrderId,
}

/// Error body returned by the shop API.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

/// Client for the shop API.
///
/// Cheaply cloneable; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ShopApiClient {
    inner: Arc<ShopApiClientInner>,
}

struct ShopApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ShopApiClient {
    /// Create a new shop API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ShopApiConfig) -> Result<Self, ShopApiError> {
        let mut headers = HeaderMap::new();

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", config.api_token.expose_secret()))
                .map_err(|e| ShopApiError::Config(format!("Invalid API token format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ShopApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ShopApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Build an error from a non-success response, keeping a short body preview.
    async fn api_error(response: reqwest::Response) -> ShopApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message: String = body.chars().take(ERROR_BODY_PREVIEW).collect();

        tracing::error!(status = %status, body = %message, "Shop API returned non-success status");

        ShopApiError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Parse a `Retry-After` header, defaulting to one second.
fn retry_after(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1)
}

#[async_trait]
impl OrderBackend for ShopApiClient {
    #[instrument(skip(self, cart_id), fields(cart_id = %cart_id))]
    async fn cart_snapshot(&self, cart_id: &CartId) -> Result<CartSnapshot, ShopApiError> {
        let url = self.endpoint(&format!(
            "carts/{}",
            urlencoding::encode(cart_id.as_str())
        ))?;

        let response = self.inner.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ShopApiError::NotFound(cart_id.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ShopApiError::RateLimited(retry_after(&response)));
            }
            status if !status.is_success() => return Err(Self::api_error(response).await),
            _ => {}
        }

        let body = response.text().await?;
        let cart: CartSnapshot = serde_json::from_str(&body)?;
        debug!(
            lines = cart.lines.len(),
            items = cart.summary.number_of_items,
            "Fetched cart snapshot"
        );

        Ok(cart)
    }

    #[instrument(skip(self, order), fields(items = order.number_of_items))]
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, OrderRejection> {
        let url = self
            .endpoint("orders")
            .map_err(OrderRejection::Unavailable)?;

        let response = self
            .inner
            .client
            .post(url)
            .json(order)
            .send()
            .await
            .map_err(|e| OrderRejection::Unavailable(e.into()))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(OrderRejection::Unavailable(ShopApiError::RateLimited(
                retry_after(&response),
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OrderRejection::Unavailable(e.into()))?;

        if status.is_success() {
            let created: CreatedOrder = serde_json::from_str(&body)
                .map_err(|e| OrderRejection::Unavailable(e.into()))?;
            debug!(order_id = %created.id, "Order created");
            return Ok(created.id);
        }

        // Validation and payment failures come back as `{ "message": "..." }`
        match serde_json::from_str::<ApiMessage>(&body) {
            Ok(api) if !api.message.trim().is_empty() => Err(OrderRejection::Refused(api.message)),
            _ => Err(OrderRejection::Unavailable(ShopApiError::Api {
                status: status.as_u16(),
                message: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            })),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::extract::Path;
    use axum::http::HeaderMap as AxumHeaders;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use secrecy::SecretString;
    use teslo_core::ShippingAddress;

    use super::*;

    const TOKEN: &str = "tk_9fQ2xL7pV4mZ8rB1";

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api/")).unwrap()
    }

    fn client(base_url: Url) -> ShopApiClient {
        ShopApiClient::new(&ShopApiConfig {
            base_url,
            api_token: SecretString::from(TOKEN),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn order() -> NewOrder {
        let address = ShippingAddress {
            address: "221B Baker Street".to_string(),
            ..ShippingAddress::default()
        };
        NewOrder::from_cart(&CartSnapshot::default(), &address)
    }

    #[tokio::test]
    async fn test_create_order_returns_assigned_id() {
        let router = Router::new().route(
            "/api/orders",
            post(|headers: AxumHeaders, Json(body): Json<serde_json::Value>| async move {
                assert_eq!(
                    headers.get("authorization").unwrap(),
                    &format!("Bearer {TOKEN}")
                );
                assert_eq!(body["isPaid"], false);
                (
                    axum::http::StatusCode::CREATED,
                    Json(serde_json::json!({ "_id": "ABC123" })),
                )
            }),
        );
        let client = client(serve(router).await);

        let id = client.create_order(&order()).await.unwrap();
        assert_eq!(id.as_str(), "ABC123");
    }

    #[tokio::test]
    async fn test_create_order_surfaces_refusal_message() {
        let router = Router::new().route(
            "/api/orders",
            post(|| async {
                (
                    axum::http::StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "message": "Card declined" })),
                )
            }),
        );
        let client = client(serve(router).await);

        let err = client.create_order(&order()).await.unwrap_err();
        assert!(matches!(err, OrderRejection::Refused(ref m) if m == "Card declined"));
        assert_eq!(err.customer_message(), "Card declined");
    }

    #[tokio::test]
    async fn test_create_order_without_message_is_unavailable() {
        let router = Router::new().route(
            "/api/orders",
            post(|| async { (axum::http::StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let client = client(serve(router).await);

        let err = client.create_order(&order()).await.unwrap_err();
        assert!(matches!(
            err,
            OrderRejection::Unavailable(ShopApiError::Api { status: 502, .. })
        ));
        assert_eq!(err.customer_message(), OrderRejection::FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_cart_snapshot_fetches_by_id() {
        let router = Router::new().route(
            "/api/carts/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "cart-1" {
                    Json(serde_json::json!({
                        "lines": [],
                        "summary": {"numberOfItems": 3, "subTotal": "30", "tax": "3", "total": "33"}
                    }))
                    .into_response()
                } else {
                    axum::http::StatusCode::NOT_FOUND.into_response()
                }
            }),
        );
        let client = client(serve(router).await);

        let cart = client.cart_snapshot(&CartId::new("cart-1")).await.unwrap();
        assert_eq!(cart.summary.number_of_items, 3);

        let missing = client.cart_snapshot(&CartId::new("gone")).await;
        assert!(matches!(missing, Err(ShopApiError::NotFound(ref id)) if id == "gone"));
    }
}
