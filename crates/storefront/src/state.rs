//! Application state shared across handlers.

use std::sync::Arc;

use crate::checkout::SubmissionController;
use crate::config::StorefrontConfig;
use crate::shop::{OrderBackend, ShopApiClient, ShopApiError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the shop API and the in-flight order submissions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    orders: Arc<dyn OrderBackend>,
    submissions: SubmissionController,
}

impl AppState {
    /// Create application state backed by the real shop API.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop API client cannot be configured.
    pub fn new(config: StorefrontConfig) -> Result<Self, ShopApiError> {
        let orders = Arc::new(ShopApiClient::new(&config.shop)?);
        Ok(Self::with_backend(config, orders))
    }

    /// Create application state with an explicit order backend.
    #[must_use]
    pub fn with_backend(config: StorefrontConfig, orders: Arc<dyn OrderBackend>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                orders,
                submissions: SubmissionController::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the shop API (carts and orders).
    #[must_use]
    pub fn orders(&self) -> &dyn OrderBackend {
        self.inner.orders.as_ref()
    }

    /// Get the order submission controller.
    #[must_use]
    pub fn submissions(&self) -> &SubmissionController {
        &self.inner.submissions
    }
}
