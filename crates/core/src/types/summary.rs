//! Daily sales summary types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sales totals for one calendar day.
///
/// Monetary fields are rounded to two decimal places and serialize as JSON
/// numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// The summarized day.
    pub date: NaiveDate,
    /// Number of orders placed that day.
    pub order_count: usize,
    /// Sum of order subtotals.
    #[serde(with = "rust_decimal::serde::float")]
    pub gross: Decimal,
    /// Sum of order discounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub discounts: Decimal,
    /// Sum of subtotals of refunded orders.
    #[serde(with = "rust_decimal::serde::float")]
    pub refunds: Decimal,
    /// `gross - refunds - discounts`.
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
    /// Total units across all line items.
    pub units: i64,
    /// `net / order_count`, zero when there are no orders.
    #[serde(with = "rust_decimal::serde::float")]
    pub average_order_value: Decimal,
    /// Per-product breakdown, highest revenue first.
    pub products: Vec<ProductSummary>,
}

/// Units and revenue for one product title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product title.
    pub name: String,
    /// Units sold.
    pub units: i64,
    /// `Σ price * quantity` over the product's line items.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}
