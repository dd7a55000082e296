//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

/// Service name reported by `/health`.
pub const SERVICE_NAME: &str = "fixedscope-shopify-proxy";

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    service: &'static str,
}

/// Liveness health check endpoint.
///
/// Returns ok if the server is running. Does not check Shopify or any
/// client configuration, and needs no proxy key.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: SERVICE_NAME,
    })
}
