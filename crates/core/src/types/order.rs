//! Order records as consumed by the daily aggregation.
//!
//! Shopify's REST API encodes money as decimal strings (`"100.00"`) but
//! hand-built fixtures and older API versions sometimes use JSON numbers, so
//! both are accepted. Every field is validated when the raw JSON is converted
//! into an [`OrderRecord`]. Values that parse but overflow when summed are
//! reported by the aggregator with the same kind of path.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Product name used when a line item has no title.
pub const UNKNOWN_PRODUCT_TITLE: &str = "?";

/// Financial status value that marks an order as refunded.
const REFUNDED_STATUS: &str = "refunded";

/// Upstream data did not have the expected shape.
///
/// `path` locates the offending field, e.g. `orders[1].line_items[0].price`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed upstream data at {path}: {reason}")]
pub struct DataShapeError {
    /// Location of the offending value.
    pub path: String,
    /// What was wrong with it.
    pub reason: String,
}

impl DataShapeError {
    pub(crate) fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A single order, reduced to the fields the daily summary needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order subtotal (before shipping and taxes).
    pub subtotal_price: Decimal,
    /// Total discounts applied to the order.
    pub total_discounts: Decimal,
    /// Shopify financial status (`paid`, `refunded`, ...), if present.
    pub financial_status: Option<String>,
    /// Line items in upstream order.
    pub line_items: Vec<LineItem>,
}

/// A line item within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product title (`"?"` when missing upstream).
    pub title: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price.
    pub price: Decimal,
}

impl OrderRecord {
    /// Whether the order's financial status is `refunded`.
    #[must_use]
    pub fn is_refunded(&self) -> bool {
        self.financial_status.as_deref() == Some(REFUNDED_STATUS)
    }

    /// Convert one raw upstream order object.
    ///
    /// `path` is the location of `value` used in error messages.
    ///
    /// # Errors
    ///
    /// Returns a [`DataShapeError`] if the value is not an object, a monetary
    /// field is not a decimal, a quantity is not an integer, or `line_items`
    /// is not an array.
    pub fn from_json(path: &str, value: &Value) -> Result<Self, DataShapeError> {
        let order = value
            .as_object()
            .ok_or_else(|| DataShapeError::new(path, "expected an order object"))?;

        let line_items = match order.get("line_items") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| LineItem::from_json(&format!("{path}.line_items[{i}]"), item))
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(DataShapeError::new(
                    format!("{path}.line_items"),
                    "expected an array",
                ));
            }
        };

        Ok(Self {
            subtotal_price: decimal_field(path, order, "subtotal_price")?,
            total_discounts: decimal_field(path, order, "total_discounts")?,
            financial_status: order
                .get("financial_status")
                .and_then(Value::as_str)
                .map(str::to_owned),
            line_items,
        })
    }
}

impl LineItem {
    /// Revenue for this line (`price * quantity`), or `None` if the product
    /// does not fit in a [`Decimal`].
    #[must_use]
    pub fn revenue(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Convert one raw upstream line item object.
    ///
    /// # Errors
    ///
    /// Returns a [`DataShapeError`] if the value is not an object, `price`
    /// is not a decimal, or `quantity` is not an integer.
    pub fn from_json(path: &str, value: &Value) -> Result<Self, DataShapeError> {
        let item = value
            .as_object()
            .ok_or_else(|| DataShapeError::new(path, "expected a line item object"))?;

        let title = match item.get("title") {
            None | Some(Value::Null) => UNKNOWN_PRODUCT_TITLE.to_owned(),
            Some(Value::String(title)) => title.clone(),
            Some(other) => other.to_string(),
        };

        Ok(Self {
            title,
            quantity: integer_field(path, item, "quantity")?,
            price: decimal_field(path, item, "price")?,
        })
    }
}

/// Read a decimal field, treating missing or `null` as zero.
fn decimal_field(
    path: &str,
    object: &Map<String, Value>,
    key: &str,
) -> Result<Decimal, DataShapeError> {
    let invalid = |reason: String| DataShapeError::new(format!("{path}.{key}"), reason);

    match object.get(key) {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::String(s)) => {
            parse_decimal(s.trim()).ok_or_else(|| invalid(format!("{s:?} is not a decimal")))
        }
        Some(Value::Number(n)) => parse_decimal(&n.to_string())
            .ok_or_else(|| invalid(format!("{n} is out of range for a decimal"))),
        Some(other) => Err(invalid(format!("expected a decimal, got {}", kind(other)))),
    }
}

/// Read an integer field, treating missing or `null` as zero.
#[allow(clippy::cast_possible_truncation)] // integral floats are range-checked first
fn integer_field(
    path: &str,
    object: &Map<String, Value>,
    key: &str,
) -> Result<i64, DataShapeError> {
    let invalid = |reason: String| DataShapeError::new(format!("{path}.{key}"), reason);

    match object.get(key) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                // Integral floats such as `2.0`
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| invalid(format!("{n} is not an integer"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(format!("{s:?} is not an integer"))),
        Some(other) => Err(invalid(format!(
            "expected an integer, got {}",
            kind(other)
        ))),
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
