//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::shopify::ShopifyClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ProxyConfig,
    shopify: ShopifyClient,
}

impl AppState {
    /// Create application state from loaded configuration and a Shopify client.
    #[must_use]
    pub fn new(config: ProxyConfig, shopify: ShopifyClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, shopify }),
        }
    }

    /// Proxy configuration.
    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.inner.config
    }

    /// Shopify client, including the token cache.
    #[must_use]
    pub fn shopify(&self) -> &ShopifyClient {
        &self.inner.shopify
    }
}
