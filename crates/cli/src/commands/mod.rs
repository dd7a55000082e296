//! CLI subcommands.
//!
//! Each command returns the text to print; `main` writes it to stdout.
//!
//! # Environment Variables
//!
//! - `{C}_STORE_URL`, `{C}_CLIENT_ID`, `{C}_CLIENT_SECRET` - per-client credentials
//! - `SHOPIFY_API_VERSION`, `SHOPIFY_TOKEN_TTL_SECS`, `SHOPIFY_REQUEST_TIMEOUT_SECS`

pub mod clients;
pub mod daily;
pub mod token;

use fixedscope_core::DataShapeError;
use fixedscope_proxy::clients::{ClientConfigError, ClientDirectory};
use fixedscope_proxy::config::{ConfigError, ShopifyConfig};
use fixedscope_proxy::shopify::{ShopifyClient, ShopifyError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Shopify settings in the environment are invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The client is not configured or its identifier is invalid.
    #[error(transparent)]
    Client(#[from] ClientConfigError),

    /// Token exchange or upstream request failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// Shopify answered with a non-200 status.
    #[error("Shopify returned HTTP {status}: {body}")]
    Upstream {
        /// Upstream status code.
        status: u16,
        /// Upstream body text.
        body: String,
    },

    /// Shopify returned orders that cannot be summarized.
    #[error(transparent)]
    DataShape(#[from] DataShapeError),

    /// The HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build a Shopify client from the process environment.
fn shopify_client() -> Result<ShopifyClient, CommandError> {
    let config = ShopifyConfig::from_env()?;
    Ok(ShopifyClient::new(&config, ClientDirectory::from_env())?)
}
