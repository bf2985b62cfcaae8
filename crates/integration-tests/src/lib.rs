//! Integration test harness for the Teslo Shop storefront.
//!
//! Builds the real router with an in-memory session store and a scripted
//! shop backend, so the checkout flow can be driven request by request with
//! `tower::ServiceExt::oneshot`. No database or network is needed.
//!
//! ```rust,ignore
//! let ctx = TestContext::new(FakeShop::accepting("ABC123"));
//! let cookie = ctx.seed_session(Some(cart_id), Some(address)).await;
//! let response = ctx.get("/checkout/summary", Some(&cookie)).await;
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use secrecy::SecretString;
use teslo_core::{CartId, CartSnapshot, NewOrder, OrderId, ShippingAddress};
use teslo_storefront::checkout::CheckoutSession;
use teslo_storefront::config::{ShopApiConfig, StorefrontConfig};
use teslo_storefront::middleware::SESSION_COOKIE_NAME;
use teslo_storefront::shop::{OrderBackend, OrderRejection, ShopApiError};
use teslo_storefront::state::AppState;
use tokio::sync::{Notify, oneshot};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

/// Storefront configuration pointing at nothing; the backend is replaced.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/teslo_storefront_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        shop: ShopApiConfig {
            base_url: url::Url::parse("http://localhost:3001/api/").unwrap(),
            api_token: SecretString::from("tk_9fQ2xL7pV4mZ8rB1"),
            timeout: Duration::from_secs(1),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Outcome the fake shop gives to order creation.
#[derive(Debug, Clone)]
pub enum OrderOutcome {
    Created(String),
    Refused(String),
    Unavailable,
}

/// Scripted shop backend: serves fixed carts and counts order calls.
pub struct FakeShop {
    carts: Mutex<HashMap<CartId, CartSnapshot>>,
    outcome: OrderOutcome,
    order_calls: AtomicUsize,
    orders: Mutex<Vec<NewOrder>>,
    /// When set, `create_order` notifies and then waits for release.
    gate: Option<(Arc<Notify>, Mutex<Option<oneshot::Receiver<()>>>)>,
}

impl FakeShop {
    fn with_outcome(outcome: OrderOutcome) -> Self {
        Self {
            carts: Mutex::new(HashMap::new()),
            outcome,
            order_calls: AtomicUsize::new(0),
            orders: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Shop that creates orders with the given ID.
    #[must_use]
    pub fn accepting(order_id: &str) -> Self {
        Self::with_outcome(OrderOutcome::Created(order_id.to_string()))
    }

    /// Shop that refuses orders with the given message.
    #[must_use]
    pub fn refusing(message: &str) -> Self {
        Self::with_outcome(OrderOutcome::Refused(message.to_string()))
    }

    /// Shop that fails without a usable message.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::with_outcome(OrderOutcome::Unavailable)
    }

    /// Hold every order call until the returned sender fires.
    ///
    /// The `Notify` is signalled once a call is inside the backend.
    #[must_use]
    pub fn gated(mut self) -> (Self, Arc<Notify>, oneshot::Sender<()>) {
        let started = Arc::new(Notify::new());
        let (tx, rx) = oneshot::channel();
        self.gate = Some((Arc::clone(&started), Mutex::new(Some(rx))));
        (self, started, tx)
    }

    /// Register a cart the shop knows about.
    #[must_use]
    pub fn with_cart(self, cart_id: &str, cart: CartSnapshot) -> Self {
        self.carts
            .lock()
            .unwrap()
            .insert(CartId::new(cart_id), cart);
        self
    }

    /// Number of order creation calls received.
    pub fn order_calls(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }

    /// Payloads of the order creation calls received.
    pub fn orders(&self) -> Vec<NewOrder> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderBackend for FakeShop {
    async fn cart_snapshot(&self, cart_id: &CartId) -> Result<CartSnapshot, ShopApiError> {
        self.carts
            .lock()
            .unwrap()
            .get(cart_id)
            .cloned()
            .ok_or_else(|| ShopApiError::NotFound(cart_id.to_string()))
    }

    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, OrderRejection> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);
        self.orders.lock().unwrap().push(order.clone());

        if let Some((started, release)) = &self.gate {
            started.notify_one();
            let rx = release.lock().unwrap().take();
            if let Some(rx) = rx {
                let _ = rx.await;
            }
        }

        match &self.outcome {
            OrderOutcome::Created(id) => Ok(OrderId::new(id.clone())),
            OrderOutcome::Refused(message) => Err(OrderRejection::Refused(message.clone())),
            OrderOutcome::Unavailable => Err(OrderRejection::Unavailable(ShopApiError::Api {
                status: 500,
                message: "boom".to_string(),
            })),
        }
    }
}

/// Router plus the pieces tests need to inspect.
pub struct TestContext {
    pub app: Router,
    pub shop: Arc<FakeShop>,
    pub state: AppState,
    store: MemoryStore,
}

impl TestContext {
    /// Build the storefront router around `shop`.
    #[must_use]
    pub fn new(shop: FakeShop) -> Self {
        let shop = Arc::new(shop);
        let backend: Arc<dyn OrderBackend> = shop.clone();
        let state = AppState::with_backend(test_config(), backend);
        let store = MemoryStore::default();
        let app = teslo_storefront::app(state.clone(), store.clone());

        Self {
            app,
            shop,
            state,
            store,
        }
    }

    /// Create a session holding `cart_id` and `address`; returns the cookie header value.
    pub async fn seed_session(
        &self,
        cart_id: Option<&str>,
        address: Option<ShippingAddress>,
    ) -> String {
        let session = Session::new(None, Arc::new(self.store.clone()), None);
        let mut checkout = CheckoutSession::load(session.clone()).await.unwrap();

        if let Some(cart_id) = cart_id {
            checkout.attach_cart(CartId::new(cart_id)).await.unwrap();
        }
        if let Some(address) = address {
            checkout.set_shipping_address(address).await.unwrap();
        }

        session.save().await.unwrap();
        let id = session.id().expect("saved session has an id");
        format!("{SESSION_COOKIE_NAME}={id}")
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// `GET path`, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request("GET", path, cookie)).await
    }

    /// `POST path` with an empty form, optionally with a session cookie.
    pub async fn post(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request("POST", path, cookie)).await
    }
}

/// Build a request with an optional session cookie.
#[must_use]
pub fn request(method: &str, path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// A deliverable address.
#[must_use]
pub fn address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: "12 St James's Square".to_string(),
        address2: None,
        zip: "SW1Y 4JH".to_string(),
        city: "London".to_string(),
        country: "GB".to_string(),
        phone: "+44 20 7946 0000".to_string(),
    }
}

/// A cart with `quantity` units of one shirt at $30.00.
#[must_use]
pub fn cart(quantity: u32) -> CartSnapshot {
    let total = 30 * quantity;
    serde_json::from_value(serde_json::json!({
        "lines": [{
            "_id": "prod-1",
            "title": "Men's Chill Crew Neck Sweatshirt",
            "slug": "mens_chill_crew_neck_sweatshirt",
            "size": "M",
            "image": "1740176-00-A_0_2000.jpg",
            "quantity": quantity,
            "price": "30.00"
        }],
        "summary": {
            "numberOfItems": quantity,
            "subTotal": format!("{total}.00"),
            "tax": format!("{}.00", total * 15 / 100),
            "total": format!("{}.00", total + total * 15 / 100)
        }
    }))
    .unwrap()
}

/// A cart with no lines.
#[must_use]
pub fn empty_cart() -> CartSnapshot {
    CartSnapshot::default()
}
