//! FixedScope Core - Shared types library.
//!
//! This crate provides the types used across all FixedScope components:
//! - `proxy` - Authenticated Shopify reverse proxy (HTTP server)
//! - `cli` - Command-line tools for checking client credentials and summaries
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Client identifiers, order records and summary types
//! - [`daily`] - Daily sales aggregation over a list of orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod daily;
pub mod types;

pub use daily::{parse_orders, summarize, summarize_orders};
pub use types::*;
