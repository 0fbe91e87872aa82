//! Connection search with cursor pagination and optional prices.

use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta};
use futures::future::try_join_all;
use serde::Serialize;

use super::{ToolError, ToolOutput, links};
use crate::format::connections::summarize_connections;
use crate::koleo::{
    KoleoApi, KoleoError,
    slug::resolve_slug,
    types::{Brand, Connection, ConnectionQuery, Price},
};

/// Connections returned when the caller does not say.
pub const DEFAULT_LENGTH: i64 = 5;

/// How far past the last departure the next page starts: half an hour and one
/// second, so a page never starts on a connection already returned.
pub const CURSOR_STEP: TimeDelta = TimeDelta::seconds(30 * 60 + 1);

/// Brand ids to search with.
///
/// `None` or an empty list means every brand. Otherwise names and logo codes
/// match case-insensitively; no match yields an empty set.
pub fn brand_filter(brands: &[Brand], wanted: Option<&[String]>) -> Vec<i64> {
    match wanted {
        Some(wanted) if !wanted.is_empty() => {
            let wanted: Vec<String> = wanted.iter().map(|b| b.to_lowercase()).collect();
            brands
                .iter()
                .filter(|b| {
                    wanted.contains(&b.name.to_lowercase())
                        || wanted.contains(&b.logo_text.to_lowercase())
                })
                .map(|b| b.id)
                .collect()
        }
        _ => brands.iter().map(|b| b.id).collect(),
    }
}

/// Collect up to `length` connections, querying page by page from `query.departure_after`.
///
/// Stops early when a page comes back empty. Pages are fetched one after
/// another since each cursor depends on the previous page.
pub async fn paginate(
    api: &dyn KoleoApi,
    mut query: ConnectionQuery,
    length: usize,
) -> Result<Vec<Connection>, KoleoError> {
    let mut results: Vec<Connection> = Vec::with_capacity(length);

    while results.len() < length {
        let page = api.search_connections(&query).await?;
        let Some(last) = page.last() else {
            tracing::debug!(collected = results.len(), "connection search exhausted");
            break;
        };
        let departure = last.departure_time().ok_or_else(|| KoleoError::Json {
            message: format!("unparseable departure time {:?}", last.departure),
            body: None,
        })?;
        tracing::debug!(
            cursor = %query.departure_after,
            page = page.len(),
            "connection page"
        );
        query.departure_after = departure + CURSOR_STEP;
        results.extend(page);
    }

    results.truncate(length);
    Ok(results)
}

/// Prices keyed by connection uuid, fetched concurrently.
///
/// Connections without a price are left out.
pub async fn fetch_prices(
    api: &dyn KoleoApi,
    connections: &[Connection],
) -> Result<HashMap<String, Price>, KoleoError> {
    let prices = try_join_all(connections.iter().map(|c| api.get_price(&c.uuid))).await?;
    Ok(connections
        .iter()
        .zip(prices)
        .filter_map(|(c, price)| price.map(|p| (c.uuid.clone(), p)))
        .collect())
}

#[derive(Debug, Serialize)]
struct PricedConnection<'a> {
    connection: &'a Connection,
    price: Option<&'a Price>,
}

#[derive(Debug, Clone)]
pub struct SearchParams<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub when: NaiveDateTime,
    pub brands: Option<&'a [String]>,
    pub direct: bool,
    pub include_prices: bool,
    pub length: i64,
}

pub async fn search_connections(
    api: &dyn KoleoApi,
    params: SearchParams<'_>,
) -> Result<ToolOutput, ToolError> {
    let start_slug = resolve_slug(params.start);
    let end_slug = resolve_slug(params.end);

    let (start, end, brands) = tokio::try_join!(
        api.get_station_by_slug(&start_slug),
        api.get_station_by_slug(&end_slug),
        api.get_brands()
    )?;

    let brand_ids = brand_filter(&brands, params.brands);
    let length = usize::try_from(params.length).unwrap_or(0);

    let results = if brand_ids.is_empty() || length == 0 {
        tracing::debug!(length, brands = brand_ids.len(), "nothing to search for");
        Vec::new()
    } else {
        let query = ConnectionQuery {
            start_station_id: start.id,
            end_station_id: end.id,
            brand_ids,
            departure_after: params.when,
            direct: params.direct,
        };
        paginate(api, query, length).await?
    };

    let prices = if params.include_prices && !results.is_empty() {
        fetch_prices(api, &results).await?
    } else {
        HashMap::new()
    };

    let data: Vec<PricedConnection> = results
        .iter()
        .map(|connection| PricedConnection {
            connection,
            price: prices.get(&connection.uuid),
        })
        .collect();

    ToolOutput::new(
        &data,
        summarize_connections(&results, &start.name, &end.name, &prices),
        links::timetable(&start_slug, &end_slug, params.when, params.direct),
    )
}
