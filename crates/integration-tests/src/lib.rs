//! Integration tests for the `FixedScope` Shopify proxy.
//!
//! The full router (auth, routing, error mapping, token cache) runs in process
//! via `tower::ServiceExt::oneshot`, with a `wiremock` server standing in for
//! the client's Shopify store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fixedscope-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use fixedscope_proxy::clients::ClientDirectory;
use fixedscope_proxy::config::ProxyConfig;
use fixedscope_proxy::middleware::PROXY_KEY_HEADER;
use fixedscope_proxy::shopify::ShopifyClient;
use fixedscope_proxy::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Proxy key every test request presents.
pub const TEST_PROXY_KEY: &str = "itest-proxy-key-7Hq2Lx9Vb4Nc";

/// Access token the mock store hands out.
pub const TEST_ACCESS_TOKEN: &str = "shpat_integration";

/// Path of the mock store's token endpoint.
pub const TOKEN_PATH: &str = "/admin/oauth/access_token";

/// Proxy router wired to a mock Shopify store for client `acme`.
pub struct TestContext {
    /// Mock store; `expect` counts are verified when the context drops.
    pub upstream: MockServer,
    app: Router,
}

/// Status and parsed body of a proxy response.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// JSON body, or `Value::Null` for an empty body.
    pub body: Value,
}

impl TestContext {
    /// Start a mock store and build the proxy in front of it.
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;

        let directory = ClientDirectory::from_vars([
            ("ACME_STORE_URL", upstream.uri()),
            ("ACME_CLIENT_ID", "acme-client".to_string()),
            ("ACME_CLIENT_SECRET", "acme-secret".to_string()),
        ]);
        let config = ProxyConfig::with_proxy_key(SecretString::from(TEST_PROXY_KEY.to_string()));
        let shopify = ShopifyClient::new(&config.shopify, directory).unwrap();
        let app = fixedscope_proxy::app(AppState::new(config, shopify));

        Self { upstream, app }
    }

    /// Mount a successful token endpoint that must be hit `expected` times.
    pub async fn mock_token(&self, expected: u64) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "access_token": TEST_ACCESS_TOKEN,
                    "scope": "read_orders,read_products,read_customers",
                })),
            )
            .expect(expected)
            .mount(&self.upstream)
            .await;
    }

    /// Admin API path on the mock store for `resource`.
    #[must_use]
    pub fn admin_path(resource: &str) -> String {
        format!("/admin/api/2026-01/{resource}")
    }

    /// GET `uri` with the proxy key.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(uri, Some(TEST_PROXY_KEY)).await
    }

    /// GET `uri` with an optional proxy key.
    pub async fn request(&self, uri: &str, key: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(key) = key {
            builder = builder.header(PROXY_KEY_HEADER, key);
        }
        let request = builder.body(Body::empty()).unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body }
    }
}
