//! Unified error handling for the proxy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fixedscope_core::DataShapeError;
use serde_json::json;
use thiserror::Error;

use crate::clients::ClientConfigError;
use crate::shopify::ShopifyError;

/// Application-level error type for proxy routes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client resolution, token exchange or upstream request failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// Shopify returned orders the aggregator cannot read.
    #[error(transparent)]
    DataShape(#[from] DataShapeError),

    /// The platform segment of the path is not supported.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ClientConfigError> for AppError {
    fn from(err: ClientConfigError) -> Self {
        Self::Shopify(ShopifyError::Configuration(err))
    }
}

impl AppError {
    /// HTTP status this error is reported with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Shopify(ShopifyError::Configuration(ClientConfigError::InvalidClientId(_)))
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Shopify(ShopifyError::Configuration(_)) | Self::UnknownPlatform(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Shopify(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Shopify(_) | Self::DataShape(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Proxy request error"
            );
        } else {
            tracing::warn!(error = %self, status = %status, "Rejected proxy request");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fixedscope_core::{ClientId, ClientIdError};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::UnknownPlatform("woocommerce".to_string());
        assert_eq!(err.to_string(), "Unknown platform: woocommerce");

        let err = AppError::BadRequest("invalid date".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid date");
    }

    #[test]
    fn test_app_error_status_codes() {
        let missing = ClientConfigError::MissingVariable {
            client: ClientId::parse("initech").unwrap(),
            variable: "INITECH_STORE_URL".to_string(),
        };

        assert_eq!(
            get_status(AppError::from(ClientConfigError::from(ClientIdError::Empty))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AppError::from(missing)), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::UnknownPlatform("woocommerce".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::from(ShopifyError::Auth {
                status: 401,
                body: "bad credentials".to_string(),
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::from(ShopifyError::InvalidResponse(
                "not json".to_string()
            ))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = AppError::UnknownPlatform("bigcommerce".to_string()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, json!({"error": "Unknown platform: bigcommerce"}));
    }

    #[test]
    fn test_auth_error_message_includes_upstream_body() {
        let err = AppError::from(ShopifyError::Auth {
            status: 400,
            body: "invalid_client".to_string(),
        });
        assert!(err.to_string().contains("invalid_client"));
    }
}
