//! Seat occupancy and the static brand/carrier lists.

use chrono::NaiveDateTime;
use serde_json::json;

use super::{ToolError, ToolOutput, parse_train_number};
use crate::koleo::{
    KoleoApi,
    slug::resolve_slug,
    types::{Brand, Connection, ConnectionQuery},
};

/// Place type used for seat statistics (second class seating).
pub const DEFAULT_PLACE_TYPE: i64 = 1;

/// Brand ids eligible for `brand`: matches on logo code or name, else all brands.
pub fn brands_for(brands: &[Brand], brand: &str) -> Vec<i64> {
    let wanted = brand.to_lowercase();
    let matching: Vec<i64> = brands
        .iter()
        .filter(|b| b.logo_text.to_lowercase() == wanted || b.name.to_lowercase() == wanted)
        .map(|b| b.id)
        .collect();
    if matching.is_empty() {
        brands.iter().map(|b| b.id).collect()
    } else {
        matching
    }
}

/// First connection carrying a train leg with `number`, or any train leg when `None`.
pub fn find_train_connection(connections: &[Connection], number: Option<i64>) -> Option<&Connection> {
    connections.iter().find(|c| {
        c.legs
            .iter()
            .filter(|leg| leg.is_train())
            .any(|leg| number.is_none() || leg.train_nr == number)
    })
}

/// The `[start, end]` pair seat statistics need.
pub fn station_pair(stations: &[String]) -> Result<(&str, &str), ToolError> {
    match stations {
        [start, end] => Ok((start.as_str(), end.as_str())),
        _ => Err(ToolError::InvalidParams(
            "stations parameter is required: provide [start_station, end_station]".to_string(),
        )),
    }
}

/// Occupancy for one train between two stations.
pub async fn get_seat_stats(
    api: &dyn KoleoApi,
    brand: &str,
    train_number: &str,
    stations: &[String],
    when: NaiveDateTime,
) -> Result<ToolOutput, ToolError> {
    let (start, end) = station_pair(stations)?;
    let start_slug = resolve_slug(start);
    let end_slug = resolve_slug(end);

    let (start, end, brands) = tokio::try_join!(
        api.get_station_by_slug(&start_slug),
        api.get_station_by_slug(&end_slug),
        api.get_brands()
    )?;

    let query = ConnectionQuery {
        start_station_id: start.id,
        end_station_id: end.id,
        brand_ids: brands_for(&brands, brand),
        departure_after: when,
        direct: false,
    };
    let connections = api.search_connections(&query).await?;

    let number = parse_train_number(train_number);
    let connection = find_train_connection(&connections, number).ok_or_else(|| {
        ToolError::NotFound(format!(
            "no connection with train {brand} {train_number} between {} and {}",
            start.name, end.name
        ))
    })?;

    let connection_id = api.get_connection_id(&connection.uuid).await?;
    let detail = api.get_connection(connection_id).await?;
    let train_nr = detail
        .trains
        .first()
        .map(|t| t.train_nr)
        .ok_or_else(|| ToolError::NotFound(format!("no trains on connection {connection_id}")))?;

    let seats = api
        .get_seats_availability(connection_id, train_nr, DEFAULT_PLACE_TYPE)
        .await?;
    let counts = seats.counts();

    let summary = format!(
        "{brand} {train_number} on {} -> {}:\n  {}/{} seats free, {} reserved, {} blocked",
        start.name, end.name, counts.free, counts.total, counts.reserved, counts.blocked
    );
    ToolOutput::new(
        json!({
            "connection_id": connection_id,
            "train_nr": train_nr,
            "seats": seats,
            "stats": counts,
        }),
        summary,
        "",
    )
}

/// Raw seat states for a known connection and train, plus counts.
pub async fn get_seat_availability(
    api: &dyn KoleoApi,
    connection_id: i64,
    train_nr: i64,
    place_type: i64,
) -> Result<ToolOutput, ToolError> {
    let seats = api
        .get_seats_availability(connection_id, train_nr, place_type)
        .await?;
    let counts = seats.counts();
    let summary = format!(
        "{}/{} seats free for connection {connection_id}, train {train_nr}, type {place_type}",
        counts.free, counts.total
    );
    ToolOutput::new(json!({ "seats": seats, "stats": counts }), summary, "")
}

pub async fn get_brands(api: &dyn KoleoApi) -> Result<ToolOutput, ToolError> {
    let brands = api.get_brands().await?;
    let mut lines = vec!["Available train brands:".to_string()];
    lines.extend(
        brands
            .iter()
            .map(|b| format!("  {:6} ({})", b.logo_text, b.name)),
    );
    ToolOutput::new(&brands, lines.join("\n"), "")
}

pub async fn get_carriers(api: &dyn KoleoApi) -> Result<ToolOutput, ToolError> {
    let carriers = api.get_carriers().await?;
    let mut lines = vec!["Train carriers:".to_string()];
    lines.extend(
        carriers
            .iter()
            .map(|c| format!("  {:6} -- {}", c.short_name, c.name)),
    );
    ToolOutput::new(&carriers, lines.join("\n"), "")
}
