//! Shopify data routes under `/api/{platform}/{client}`.
//!
//! Each handler checks the proxy key, validates the platform and client
//! segments, then forwards a single GET to the client's store. Upstream
//! non-200 responses are returned as `{"error": <body>}` with status 200.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use fixedscope_core::{ClientId, summarize_orders};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::clients::ClientConfigError;
use crate::error::AppError;
use crate::middleware::RequireProxyKey;
use crate::shopify::UpstreamResponse;
use crate::state::AppState;

/// The only platform currently served.
pub const SHOPIFY_PLATFORM: &str = "shopify";

/// Shopify's maximum page size for orders.
const ORDERS_LIMIT: u32 = 250;
const PRODUCTS_LIMIT: u32 = 50;

/// `{platform}` and `{client}` path segments.
#[derive(Debug, Deserialize)]
pub struct ClientPath {
    platform: String,
    client: String,
}

impl ClientPath {
    fn client(self) -> Result<ClientId, AppError> {
        if self.platform != SHOPIFY_PLATFORM {
            return Err(AppError::UnknownPlatform(self.platform));
        }
        ClientId::parse(&self.client).map_err(|e| ClientConfigError::from(e).into())
    }
}

/// Query parameters for `/orders`.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Single day to list.
    pub date: Option<NaiveDate>,
    /// First day of a range; used only together with `end`.
    pub start: Option<NaiveDate>,
    /// Last day of a range; used only together with `start`.
    pub end: Option<NaiveDate>,
}

/// Query parameters for `/orders/count`.
#[derive(Debug, Default, Deserialize)]
pub struct OrderCountQuery {
    /// Calendar year to count.
    pub year: Option<i32>,
}

/// Query parameters for `/daily`.
#[derive(Debug, Default, Deserialize)]
pub struct DailyQuery {
    /// Day to summarize; today in server local time when absent.
    pub date: Option<NaiveDate>,
}

type Params = Vec<(&'static str, String)>;

fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn created_between(params: &mut Params, min: NaiveDate, max: NaiveDate) {
    params.push(("created_at_min", format!("{min}T00:00:00")));
    params.push(("created_at_max", format!("{max}T23:59:59")));
}

/// Query string for `orders.json`. A complete `start`/`end` pair wins over
/// `date`; a lone `start` or `end` is ignored.
pub fn orders_params(query: &OrdersQuery) -> Params {
    let mut params = vec![
        ("status", "any".to_string()),
        ("limit", ORDERS_LIMIT.to_string()),
    ];

    match (query.start, query.end, query.date) {
        (Some(start), Some(end), _) => created_between(&mut params, start, end),
        (_, _, Some(date)) => created_between(&mut params, date, date),
        _ => {}
    }

    params
}

/// Query string for `orders/count.json`.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a year outside `1..=9999`.
pub fn order_count_params(query: &OrderCountQuery) -> Result<Params, AppError> {
    let mut params = vec![("status", "any".to_string())];

    if let Some(year) = query.year {
        let bounds = NaiveDate::from_ymd_opt(year, 1, 1)
            .zip(NaiveDate::from_ymd_opt(year, 12, 31))
            .filter(|_| (1..=9999).contains(&year))
            .ok_or_else(|| AppError::BadRequest(format!("year out of range: {year}")))?;
        created_between(&mut params, bounds.0, bounds.1);
    }

    Ok(params)
}

/// GET `/api/{platform}/{client}/shop`
pub async fn shop(
    _: RequireProxyKey,
    State(state): State<AppState>,
    Path(path): Path<ClientPath>,
) -> Result<Json<Value>, AppError> {
    let client = path.client()?;
    let response = state.shopify().fetch(&client, "shop.json", &[]).await?;
    Ok(Json(response.into_json()))
}

/// GET `/api/{platform}/{client}/orders`
pub async fn orders(
    _: RequireProxyKey,
    State(state): State<AppState>,
    Path(path): Path<ClientPath>,
    params: Result<Query<OrdersQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let client = path.client()?;
    let params = orders_params(&query(params)?);
    let response = state.shopify().fetch(&client, "orders.json", &params).await?;
    Ok(Json(response.into_json()))
}

/// GET `/api/{platform}/{client}/products`
pub async fn products(
    _: RequireProxyKey,
    State(state): State<AppState>,
    Path(path): Path<ClientPath>,
) -> Result<Json<Value>, AppError> {
    let client = path.client()?;
    let params = [("limit", PRODUCTS_LIMIT.to_string())];
    let response = state
        .shopify()
        .fetch(&client, "products.json", &params)
        .await?;
    Ok(Json(response.into_json()))
}

/// GET `/api/{platform}/{client}/customers/count`
pub async fn customers_count(
    _: RequireProxyKey,
    State(state): State<AppState>,
    Path(path): Path<ClientPath>,
) -> Result<Json<Value>, AppError> {
    let client = path.client()?;
    let response = state
        .shopify()
        .fetch(&client, "customers/count.json", &[])
        .await?;
    Ok(Json(response.into_json()))
}

/// GET `/api/{platform}/{client}/orders/count`
pub async fn orders_count(
    _: RequireProxyKey,
    State(state): State<AppState>,
    Path(path): Path<ClientPath>,
    params: Result<Query<OrderCountQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let client = path.client()?;
    let params = order_count_params(&query(params)?)?;
    let response = state
        .shopify()
        .fetch(&client, "orders/count.json", &params)
        .await?;
    Ok(Json(response.into_json()))
}

/// GET `/api/{platform}/{client}/daily`
///
/// Summarizes one day of orders. An upstream error is passed through as the
/// error envelope rather than summarized as an empty day.
pub async fn daily(
    _: RequireProxyKey,
    State(state): State<AppState>,
    Path(path): Path<ClientPath>,
    params: Result<Query<DailyQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let client = path.client()?;
    let date = query(params)?
        .date
        .unwrap_or_else(|| Local::now().date_naive());
    let params = orders_params(&OrdersQuery {
        date: Some(date),
        ..OrdersQuery::default()
    });

    match state.shopify().fetch(&client, "orders.json", &params).await? {
        UpstreamResponse::Json(body) => {
            let summary = summarize_orders(date, &body)?;
            debug!(
                client = %client,
                date = %date,
                order_count = summary.order_count,
                "Built daily summary"
            );
            Ok(Json(summary).into_response())
        }
        error @ UpstreamResponse::Error { .. } => Ok(Json(error.into_json()).into_response()),
    }
}
