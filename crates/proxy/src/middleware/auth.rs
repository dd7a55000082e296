//! Shared-key authentication for `/api` routes.

use axum::{extract::FromRequestParts, http::StatusCode, http::request::Parts};
use secrecy::ExposeSecret;

use crate::state::AppState;

/// Header inbound callers put the proxy key in.
pub const PROXY_KEY_HEADER: &str = "X-FixedScope-Key";

/// Extractor that requires the proxy key.
///
/// Rejects with a bare `401 Unauthorized` when the header is missing or does
/// not match, before any other extractor or handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_: RequireProxyKey) -> impl IntoResponse {
///     "ok"
/// }
/// ```
pub struct RequireProxyKey;

impl FromRequestParts<AppState> for RequireProxyKey {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(PROXY_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let expected = state.config().proxy_key.expose_secret();

        if constant_time_compare(expected, provided) {
            Ok(Self)
        } else {
            tracing::warn!(path = %parts.uri.path(), "Rejected request with wrong proxy key");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "ab"));
        assert!(!constant_time_compare("", "a"));
    }
}
