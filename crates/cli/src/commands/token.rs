//! `fs-cli token <client>`
//!
//! Performs a real token exchange against the client's store. The token
//! itself is never printed.

use chrono::{DateTime, Utc};
use fixedscope_core::ClientId;
use fixedscope_proxy::clients::ClientConfigError;
use fixedscope_proxy::shopify::CachedToken;

use super::{CommandError, shopify_client};

/// Exchange `client`'s credentials and report when the token expires.
///
/// # Errors
///
/// Returns `CommandError` if the client is not configured or the exchange
/// fails.
pub async fn check(client: &str) -> Result<String, CommandError> {
    let client = ClientId::parse(client).map_err(ClientConfigError::from)?;
    let shopify = shopify_client()?;

    let token = shopify.tokens().get_valid_token(&client).await?;

    Ok(render(&client, &token, Utc::now()))
}

fn render(client: &ClientId, token: &CachedToken, now: DateTime<Utc>) -> String {
    let remaining = token.expires_at - now;
    format!(
        "{client}: token exchange ok, expires {} (in {}h {}m)",
        token.expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
        remaining.num_hours(),
        remaining.num_minutes() % 60
    )
}
