//! Access token exchange and caching.
//!
//! Tokens come from the store's OAuth endpoint via the client-credentials
//! grant and are kept in memory per client until they expire. A refresh for
//! one client holds that client's cache entry, so concurrent requests that
//! miss the cache share a single exchange while other clients proceed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use fixedscope_core::ClientId;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::ShopifyError;
use crate::clients::{ClientConfig, ClientDirectory};

/// An access token and the instant it stops being usable.
#[derive(Clone)]
pub struct CachedToken {
    /// Admin API access token.
    pub access_token: SecretString,
    /// When the cache stops handing out this token.
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl CachedToken {
    /// Whether the token may still be used.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }

    fn same_as(&self, other: &Self) -> bool {
        self.expires_at == other.expires_at
            && self.access_token.expose_secret() == other.access_token.expose_secret()
    }
}

/// Response from the OAuth token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

/// Per-client access token cache.
#[derive(Clone)]
pub struct TokenCache {
    inner: Arc<TokenCacheInner>,
}

struct TokenCacheInner {
    http: reqwest::Client,
    directory: Arc<ClientDirectory>,
    ttl: TimeDelta,
    tokens: Cache<ClientId, CachedToken>,
}

impl TokenCache {
    /// Create an empty cache.
    ///
    /// `ttl` is how long a freshly exchanged token is reused.
    #[must_use]
    pub fn new(http: reqwest::Client, directory: Arc<ClientDirectory>, ttl: Duration) -> Self {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);

        Self {
            inner: Arc::new(TokenCacheInner {
                http,
                directory,
                ttl,
                tokens: Cache::builder().build(),
            }),
        }
    }

    /// Return a usable token for `client`, exchanging credentials if needed.
    ///
    /// # Errors
    ///
    /// - `ShopifyError::Configuration` if the client's credentials are not
    ///   configured (no request is made)
    /// - `ShopifyError::Auth` if the token endpoint answers non-2xx or omits
    ///   the token
    /// - `ShopifyError::Unavailable` if the token endpoint cannot be reached
    ///
    /// A failed exchange leaves the cache untouched.
    #[instrument(skip(self), fields(client = %client))]
    pub async fn get_valid_token(&self, client: &ClientId) -> Result<CachedToken, ShopifyError> {
        if let Some(token) = self.inner.tokens.get(client).await
            && token.is_valid()
        {
            debug!("Using cached access token");
            return Ok(token);
        }

        let config = self.inner.directory.resolve(client)?;
        let config = &config;

        let result = self
            .inner
            .tokens
            .entry(client.clone())
            .and_try_compute_with(|existing| async move {
                // Another request may have refreshed while this one waited
                if let Some(entry) = existing
                    && entry.value().is_valid()
                {
                    return Ok(Op::Nop);
                }
                self.exchange(config).await.map(Op::Put)
            })
            .await?;

        match result {
            CompResult::Inserted(entry)
            | CompResult::ReplacedWith(entry)
            | CompResult::Unchanged(entry) => Ok(entry.into_value()),
            CompResult::StillNone(_) | CompResult::Removed(_) => Err(
                ShopifyError::InvalidResponse("token cache entry vanished".to_string()),
            ),
        }
    }

    /// Drop the cached token for `client`, if any.
    pub async fn invalidate(&self, client: &ClientId) {
        self.inner.tokens.invalidate(client).await;
    }

    /// Drop `client`'s cached token only if it is still `rejected`.
    ///
    /// A token exchanged after `rejected` was handed out is kept.
    pub async fn invalidate_if_current(&self, client: &ClientId, rejected: &CachedToken) {
        self.inner
            .tokens
            .entry_by_ref(client)
            .and_compute_with(|existing| async move {
                match existing {
                    Some(entry) if entry.value().same_as(rejected) => Op::Remove,
                    _ => Op::Nop,
                }
            })
            .await;
    }

    #[instrument(skip(self, config), fields(client = %config.client))]
    async fn exchange(&self, config: &ClientConfig) -> Result<CachedToken, ShopifyError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.expose_secret()),
        ];

        let response = self
            .inner
            .http
            .post(config.token_url())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, "Token exchange rejected");
            return Err(ShopifyError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let Some(parsed) = serde_json::from_str::<TokenResponse>(&body).ok() else {
            return Err(ShopifyError::Auth {
                status: status.as_u16(),
                body,
            });
        };

        let Some(access_token) = parsed.access_token.filter(|t| !t.is_empty()) else {
            warn!("Token endpoint response did not include an access token");
            return Err(ShopifyError::Auth {
                status: status.as_u16(),
                body,
            });
        };

        let expires_at = Utc::now()
            .checked_add_signed(self.inner.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        info!(
            scope = parsed.scope.as_deref().unwrap_or(""),
            expires_at = %expires_at,
            "Exchanged client credentials for access token"
        );

        Ok(CachedToken {
            access_token: SecretString::from(access_token),
            expires_at,
        })
    }
}
