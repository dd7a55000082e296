//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                   - Health check (no key)
//!
//! # Shopify (X-FixedScope-Key required)
//! GET  /api/{platform}/{client}/shop             - shop.json
//! GET  /api/{platform}/{client}/orders           - orders.json (?date | ?start&end)
//! GET  /api/{platform}/{client}/orders/count     - orders/count.json (?year)
//! GET  /api/{platform}/{client}/products         - products.json
//! GET  /api/{platform}/{client}/customers/count  - customers/count.json
//! GET  /api/{platform}/{client}/daily            - daily summary (?date)
//! ```

use axum::{Router, routing::get};

use crate::state::AppState;

pub mod health;
pub mod shopify;

/// Build the route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/{platform}/{client}/shop", get(shopify::shop))
        .route("/api/{platform}/{client}/orders", get(shopify::orders))
        .route(
            "/api/{platform}/{client}/orders/count",
            get(shopify::orders_count),
        )
        .route("/api/{platform}/{client}/products", get(shopify::products))
        .route(
            "/api/{platform}/{client}/customers/count",
            get(shopify::customers_count),
        )
        .route("/api/{platform}/{client}/daily", get(shopify::daily))
}
