//! Authenticated Admin REST API requests.

use std::sync::Arc;

use fixedscope_core::ClientId;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use super::{ACCESS_TOKEN_HEADER, ShopifyError, TokenCache};
use crate::clients::ClientDirectory;
use crate::config::ShopifyConfig;

/// Outcome of an upstream request that reached Shopify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamResponse {
    /// 200 response body, unmodified.
    Json(Value),
    /// Any other status, with the raw body text.
    Error {
        /// Upstream status code.
        status: StatusCode,
        /// Upstream body text.
        body: String,
    },
}

impl UpstreamResponse {
    /// The JSON to hand back to callers: the body itself, or
    /// `{"error": <body text>}` for non-200 responses.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Error { body, .. } => json!({ "error": body }),
        }
    }
}

/// Shopify Admin REST API client shared by every client store.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    http: reqwest::Client,
    directory: Arc<ClientDirectory>,
    tokens: TokenCache,
    api_version: String,
}

impl ShopifyClient {
    /// Create a client for the stores in `directory`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig, directory: ClientDirectory) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let directory = Arc::new(directory);
        let tokens = TokenCache::new(http.clone(), Arc::clone(&directory), config.token_ttl);

        Ok(Self {
            inner: Arc::new(ShopifyClientInner {
                http,
                directory,
                tokens,
                api_version: config.api_version.clone(),
            }),
        })
    }

    /// The token cache backing this client.
    #[must_use]
    pub fn tokens(&self) -> &TokenCache {
        &self.inner.tokens
    }

    /// The configured client stores.
    #[must_use]
    pub fn directory(&self) -> &ClientDirectory {
        &self.inner.directory
    }

    /// Admin API version used in request paths.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    /// GET an Admin REST resource such as `orders.json` for `client`.
    ///
    /// A 401 from Shopify evicts the token it rejected, unless the cache has
    /// already replaced it, so the next call exchanges a new one; the 401
    /// itself is still returned as [`UpstreamResponse::Error`].
    ///
    /// # Errors
    ///
    /// - `ShopifyError::Configuration` / `ShopifyError::Auth` from token
    ///   acquisition
    /// - `ShopifyError::Unavailable` on connection failure or timeout
    /// - `ShopifyError::InvalidResponse` if a 200 body is not JSON
    #[instrument(skip(self, params), fields(client = %client))]
    pub async fn fetch(
        &self,
        client: &ClientId,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<UpstreamResponse, ShopifyError> {
        let config = self.inner.directory.resolve(client)?;
        let token = self.inner.tokens.get_valid_token(client).await?;

        let response = self
            .inner
            .http
            .get(config.resource_url(&self.inner.api_version, resource))
            .header(ACCESS_TOKEN_HEADER, token.access_token.expose_secret())
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::OK {
            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes)
                .map(UpstreamResponse::Json)
                .map_err(|e| ShopifyError::InvalidResponse(e.to_string()));
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("Shopify rejected access token, evicting it");
            self.inner.tokens.invalidate_if_current(client, &token).await;
        } else {
            warn!(status = %status, resource, "Shopify returned an error");
        }

        let body = response.text().await?;
        Ok(UpstreamResponse::Error { status, body })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn acme() -> ClientId {
        ClientId::parse("acme").unwrap()
    }

    async fn mock_token(server: &MockServer, expected: u64) {
        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "shpat_test"})),
            )
            .expect(expected)
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer, timeout: Duration) -> ShopifyClient {
        let directory = ClientDirectory::from_vars([
            ("ACME_STORE_URL", server.uri()),
            ("ACME_CLIENT_ID", "acme-client".to_string()),
            ("ACME_CLIENT_SECRET", "acme-secret".to_string()),
        ]);
        let config = ShopifyConfig {
            request_timeout: timeout,
            ..ShopifyConfig::default()
        };
        ShopifyClient::new(&config, directory).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_unmodified() {
        let server = MockServer::start().await;
        mock_token(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2026-01/shop.json"))
            .and(header("X-Shopify-Access-Token", "shpat_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"a": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let response = client.fetch(&acme(), "shop.json", &[]).await.unwrap();

        assert_eq!(response, UpstreamResponse::Json(serde_json::json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_fetch_sends_query_parameters() {
        let server = MockServer::start().await;
        mock_token(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2026-01/orders.json"))
            .and(query_param("status", "any"))
            .and(query_param("limit", "250"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"orders": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let params = [("status", "any".to_string()), ("limit", "250".to_string())];
        let response = client.fetch(&acme(), "orders.json", &params).await.unwrap();

        assert_eq!(response.into_json(), serde_json::json!({"orders": []}));
    }

    #[tokio::test]
    async fn test_non_200_becomes_error_envelope() {
        let server = MockServer::start().await;
        mock_token(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2026-01/products.json"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let response = client.fetch(&acme(), "products.json", &[]).await.unwrap();

        match &response {
            UpstreamResponse::Error { status, body } => {
                assert_eq!(*status, StatusCode::NOT_FOUND);
                assert_eq!(body, "not found");
            }
            UpstreamResponse::Json(_) => panic!("expected an error response"),
        }
        assert_eq!(response.into_json(), serde_json::json!({"error": "not found"}));
    }

    #[tokio::test]
    async fn test_unauthorized_evicts_cached_token() {
        let server = MockServer::start().await;
        mock_token(&server, 2).await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2026-01/shop.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));

        for _ in 0..2 {
            let response = client.fetch(&acme(), "shop.json", &[]).await.unwrap();
            assert!(matches!(
                response,
                UpstreamResponse::Error { status: StatusCode::UNAUTHORIZED, .. }
            ));
        }
    }

    #[tokio::test]
    async fn test_non_json_200_is_invalid_response() {
        let server = MockServer::start().await;
        mock_token(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2026-01/shop.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.fetch(&acme(), "shop.json", &[]).await.unwrap_err();

        assert!(matches!(err, ShopifyError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;
        mock_token(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2026-01/shop.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(200));
        let err = client.fetch(&acme(), "shop.json", &[]).await.unwrap_err();

        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_before_any_request() {
        let server = MockServer::start().await;
        mock_token(&server, 0).await;

        let client = client_for(&server, Duration::from_secs(5));
        let initech = ClientId::parse("initech").unwrap();
        let err = client.fetch(&initech, "shop.json", &[]).await.unwrap_err();

        assert!(matches!(err, ShopifyError::Configuration(_)));
    }
}
