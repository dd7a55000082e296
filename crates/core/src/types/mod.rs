//! Core types for FixedScope.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod client_id;
pub mod order;
pub mod summary;

pub use client_id::{ClientId, ClientIdError};
pub use order::{DataShapeError, LineItem, OrderRecord, UNKNOWN_PRODUCT_TITLE};
pub use summary::{DailySummary, ProductSummary};
