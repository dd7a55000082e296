//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. [`RequireProxyKey`] extractor on every `/api` handler

pub mod auth;

pub use auth::{PROXY_KEY_HEADER, RequireProxyKey};
