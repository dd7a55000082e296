//! Shopify Admin REST API access (read-only).
//!
//! # Architecture
//!
//! - [`TokenCache`] exchanges each client's OAuth credentials for an access
//!   token (client-credentials grant) and reuses it until shortly before it
//!   expires
//! - [`ShopifyClient`] issues authenticated GET requests against the Admin
//!   REST API and hands back the JSON body, or the upstream error text for
//!   non-200 responses
//! - No retries: every failure surfaces to the caller immediately
//!
//! # Example
//!
//! ```rust,ignore
//! use fixedscope_proxy::shopify::ShopifyClient;
//!
//! let client = ShopifyClient::new(&config.shopify, ClientDirectory::from_env())?;
//! let acme = ClientId::parse("acme")?;
//!
//! let shop = client.fetch(&acme, "shop.json", &[]).await?.into_json();
//! ```

mod client;
mod token;

pub use client::{ShopifyClient, UpstreamResponse};
pub use token::{CachedToken, TokenCache};

use thiserror::Error;

use crate::clients::ClientConfigError;

/// Header carrying the Admin API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Errors that can occur when talking to Shopify.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// The client's credentials are missing or invalid; no request was made.
    #[error(transparent)]
    Configuration(#[from] ClientConfigError),

    /// The token endpoint rejected the exchange or returned no token.
    #[error("Token exchange failed (HTTP {status}): {body}")]
    Auth {
        /// HTTP status of the token endpoint response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Shopify could not be reached (connection error or timeout).
    #[error("Shopify unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// Shopify answered 200 but the body was not JSON.
    #[error("Invalid response from Shopify: {0}")]
    InvalidResponse(String),
}

impl ShopifyError {
    /// Whether the request failed because the upstream timeout elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Unavailable(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use fixedscope_core::ClientIdError;

    use super::*;

    #[test]
    fn test_auth_error_display_includes_body() {
        let err = ShopifyError::Auth {
            status: 400,
            body: r#"{"error":"invalid_client"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"Token exchange failed (HTTP 400): {"error":"invalid_client"}"#
        );
    }

    #[test]
    fn test_configuration_error_is_transparent() {
        let err = ShopifyError::from(ClientConfigError::from(ClientIdError::Empty));
        assert_eq!(
            err.to_string(),
            "Invalid client identifier: client identifier cannot be empty"
        );
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_invalid_response_display() {
        let err = ShopifyError::InvalidResponse("expected value at line 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid response from Shopify: expected value at line 1"
        );
    }
}
