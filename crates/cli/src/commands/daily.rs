//! `fs-cli daily <client> [--date YYYY-MM-DD]`

use chrono::{Local, NaiveDate};
use fixedscope_core::{ClientId, DailySummary, summarize_orders};
use fixedscope_proxy::clients::ClientConfigError;
use fixedscope_proxy::routes::shopify::{OrdersQuery, orders_params};
use fixedscope_proxy::shopify::{ShopifyClient, UpstreamResponse};

use super::{CommandError, shopify_client};

/// Fetch a day's orders for `client` and print the summary as pretty JSON.
///
/// # Errors
///
/// Returns `CommandError` if the client is not configured, Shopify fails or
/// answers non-200, or the orders cannot be summarized.
pub async fn print(client: &str, date: Option<NaiveDate>) -> Result<String, CommandError> {
    let client = ClientId::parse(client).map_err(ClientConfigError::from)?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    let summary = summary(&shopify_client()?, &client, date).await?;
    Ok(serde_json::to_string_pretty(&summary)?)
}

async fn summary(
    shopify: &ShopifyClient,
    client: &ClientId,
    date: NaiveDate,
) -> Result<DailySummary, CommandError> {
    let params = orders_params(&OrdersQuery {
        date: Some(date),
        ..OrdersQuery::default()
    });

    match shopify.fetch(client, "orders.json", &params).await? {
        UpstreamResponse::Json(body) => Ok(summarize_orders(date, &body)?),
        UpstreamResponse::Error { status, body } => Err(CommandError::Upstream {
            status: status.as_u16(),
            body,
        }),
    }
}
