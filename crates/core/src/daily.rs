//! Daily sales aggregation.
//!
//! Reduces one day's orders to a [`DailySummary`]. Amounts accumulate as exact
//! decimals and are rounded once, when the summary is built.
//!
//! # Refunds
//!
//! `refunds` is the sum of `subtotal_price` over orders whose financial status
//! is `refunded`, and `net` subtracts both refunds and discounts. A refunded
//! order's discount is therefore subtracted twice.
//!
//! TODO: switch to the order's refund transactions once finance confirms which
//! refund amount the daily report should show.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::types::{DailySummary, DataShapeError, OrderRecord, ProductSummary};

/// Decimal places for monetary output.
const MONEY_DP: u32 = 2;

/// Validate the `orders` array of an upstream `orders.json` response.
///
/// # Errors
///
/// Returns a [`DataShapeError`] if `body` has no `orders` array or any order
/// in it is malformed.
pub fn parse_orders(body: &Value) -> Result<Vec<OrderRecord>, DataShapeError> {
    let orders = body
        .get("orders")
        .and_then(Value::as_array)
        .ok_or_else(|| DataShapeError::new("orders", "expected an array of orders"))?;

    orders
        .iter()
        .enumerate()
        .map(|(i, order)| OrderRecord::from_json(&format!("orders[{i}]"), order))
        .collect()
}

/// Validate an upstream `orders.json` body and summarize it.
///
/// # Errors
///
/// Returns a [`DataShapeError`] if the body is malformed (see [`parse_orders`])
/// or its totals overflow (see [`summarize`]).
pub fn summarize_orders(date: NaiveDate, body: &Value) -> Result<DailySummary, DataShapeError> {
    let orders = parse_orders(body)?;
    summarize(date, &orders)
}

/// Summarize a day's orders.
///
/// Products are sorted by revenue, highest first; products with equal revenue
/// keep the order in which they were first seen.
///
/// # Errors
///
/// Returns a [`DataShapeError`] pointing at the first order or line item whose
/// amount or quantity pushes a total out of range.
pub fn summarize(date: NaiveDate, orders: &[OrderRecord]) -> Result<DailySummary, DataShapeError> {
    let mut gross = Decimal::ZERO;
    let mut discounts = Decimal::ZERO;
    let mut refunds = Decimal::ZERO;
    let mut units = 0_i64;
    let mut products = ProductTotals::default();

    for (i, order) in orders.iter().enumerate() {
        let field = |key: &str| out_of_range(format!("orders[{i}].{key}"));

        gross = gross
            .checked_add(order.subtotal_price)
            .ok_or_else(|| field("subtotal_price"))?;
        discounts = discounts
            .checked_add(order.total_discounts)
            .ok_or_else(|| field("total_discounts"))?;
        if order.is_refunded() {
            refunds = refunds
                .checked_add(order.subtotal_price)
                .ok_or_else(|| field("subtotal_price"))?;
        }

        for (j, item) in order.line_items.iter().enumerate() {
            let line = |suffix: &str| out_of_range(format!("orders[{i}].line_items[{j}]{suffix}"));

            units = units
                .checked_add(item.quantity)
                .ok_or_else(|| line(".quantity"))?;
            let revenue = item.revenue().ok_or_else(|| line(""))?;
            products
                .add(&item.title, item.quantity, revenue)
                .ok_or_else(|| line(""))?;
        }
    }

    let net = gross
        .checked_sub(refunds)
        .and_then(|net| net.checked_sub(discounts))
        .ok_or_else(|| out_of_range("orders".to_owned()))?;
    // Dividing by a count of at least one cannot overflow
    let average_order_value = if orders.is_empty() {
        Decimal::ZERO
    } else {
        net / Decimal::from(orders.len())
    };

    Ok(DailySummary {
        date,
        order_count: orders.len(),
        gross: round_money(gross),
        discounts: round_money(discounts),
        refunds: round_money(refunds),
        net: round_money(net),
        units,
        average_order_value: round_money(average_order_value),
        products: products.into_sorted(),
    })
}

fn out_of_range(path: String) -> DataShapeError {
    DataShapeError::new(path, "value pushes the daily total out of range")
}

/// Round half to even at two places.
fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Per-title totals in first-seen order.
#[derive(Default)]
struct ProductTotals {
    index: HashMap<String, usize>,
    entries: Vec<ProductSummary>,
}

impl ProductTotals {
    /// Returns `None` if the title's totals overflow.
    fn add(&mut self, title: &str, quantity: i64, revenue: Decimal) -> Option<()> {
        let position = if let Some(&position) = self.index.get(title) {
            position
        } else {
            self.entries.push(ProductSummary {
                name: title.to_owned(),
                units: 0,
                revenue: Decimal::ZERO,
            });
            let position = self.entries.len() - 1;
            self.index.insert(title.to_owned(), position);
            position
        };

        let entry = self.entries.get_mut(position)?;
        entry.units = entry.units.checked_add(quantity)?;
        entry.revenue = entry.revenue.checked_add(revenue)?;
        Some(())
    }

    fn into_sorted(self) -> Vec<ProductSummary> {
        let mut entries = self.entries;
        // `sort_by` is stable, so ties keep first-seen order
        entries.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        for entry in &mut entries {
            entry.revenue = round_money(entry.revenue);
        }
        entries
    }
}
