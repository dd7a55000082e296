//! Integration tests for the daily summary route.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use fixedscope_integration_tests::TestContext;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mock_orders(ctx: &TestContext, date: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(TestContext::admin_path("orders.json")))
        .and(query_param("status", "any"))
        .and(query_param("limit", "250"))
        .and(query_param("created_at_min", format!("{date}T00:00:00")))
        .and(query_param("created_at_max", format!("{date}T23:59:59")))
        .respond_with(response)
        .expect(1)
        .mount(&ctx.upstream)
        .await;
}

#[tokio::test]
async fn test_daily_summary_for_paid_and_refunded_orders() {
    let ctx = TestContext::new().await;
    ctx.mock_token(1).await;
    mock_orders(
        &ctx,
        "2026-03-14",
        ResponseTemplate::new(200).set_body_json(json!({
            "orders": [
                {
                    "subtotal_price": "100.00",
                    "total_discounts": "10.00",
                    "financial_status": "paid",
                    "line_items": [{"title": "Widget", "quantity": 2, "price": "25.00"}]
                },
                {
                    "subtotal_price": "50.00",
                    "total_discounts": "0.00",
                    "financial_status": "refunded",
                    "line_items": [{"title": "Widget", "quantity": 1, "price": "25.00"}]
                }
            ]
        })),
    )
    .await;

    let response = ctx.get("/api/shopify/acme/daily?date=2026-03-14").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "date": "2026-03-14",
            "order_count": 2,
            "gross": 150.0,
            "discounts": 10.0,
            "refunds": 50.0,
            "net": 90.0,
            "units": 3,
            "average_order_value": 45.0,
            "products": [{"name": "Widget", "units": 3, "revenue": 75.0}]
        })
    );
}

#[tokio::test]
async fn test_daily_summary_without_orders() {
    let ctx = TestContext::new().await;
    ctx.mock_token(1).await;
    mock_orders(
        &ctx,
        "2026-01-01",
        ResponseTemplate::new(200).set_body_json(json!({"orders": []})),
    )
    .await;

    let response = ctx.get("/api/shopify/acme/daily?date=2026-01-01").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["order_count"], 0);
    assert_eq!(response.body["average_order_value"], 0.0);
    assert_eq!(response.body["products"], json!([]));
}

#[tokio::test]
async fn test_daily_upstream_error_is_passed_through() {
    let ctx = TestContext::new().await;
    ctx.mock_token(1).await;
    mock_orders(
        &ctx,
        "2026-03-14",
        ResponseTemplate::new(403).set_body_string("This action requires merchant approval"),
    )
    .await;

    let response = ctx.get("/api/shopify/acme/daily?date=2026-03-14").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"error": "This action requires merchant approval"})
    );
}

#[tokio::test]
async fn test_daily_malformed_order_is_bad_gateway() {
    let ctx = TestContext::new().await;
    ctx.mock_token(1).await;
    mock_orders(
        &ctx,
        "2026-03-14",
        ResponseTemplate::new(200).set_body_json(json!({
            "orders": [{"subtotal_price": "twelve"}]
        })),
    )
    .await;

    let response = ctx.get("/api/shopify/acme/daily?date=2026-03-14").await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("orders[0].subtotal_price"));
}

#[tokio::test]
async fn test_daily_overflowing_totals_are_bad_gateway() {
    let ctx = TestContext::new().await;
    ctx.mock_token(1).await;
    mock_orders(
        &ctx,
        "2026-03-14",
        ResponseTemplate::new(200).set_body_json(json!({
            "orders": [{"line_items": [
                {"title": "Widget", "quantity": 2, "price": "79228162514264337593543950335"}
            ]}]
        })),
    )
    .await;

    let response = ctx.get("/api/shopify/acme/daily?date=2026-03-14").await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("orders[0].line_items[0]"));
}

#[tokio::test]
async fn test_daily_rejects_malformed_date() {
    let ctx = TestContext::new().await;
    ctx.mock_token(0).await;

    let response = ctx.get("/api/shopify/acme/daily?date=2026-02-30").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
