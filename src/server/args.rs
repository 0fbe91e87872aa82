//! Argument types for MCP tools

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchStationsRequest {
    /// Partial or full station name, e.g. "Kraków" or "Warszawa Cent"
    pub query: String,
    /// Optional station type: "rail", "bus" or "group"
    pub station_type: Option<String>,
    /// Optional ISO country code, e.g. "pl"
    pub country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StationRequest {
    /// Station name or slug, e.g. "Kraków Główny" or "krakow-glowny"
    pub station: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BoardRequest {
    /// Station name or slug
    pub station: String,
    /// ISO date or datetime, e.g. "2026-02-27" or "2026-02-27T14:00". Defaults to now.
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchConnectionsRequest {
    /// Departure station name or slug
    pub start: String,
    /// Arrival station name or slug
    pub end: String,
    /// Earliest departure as ISO date or datetime. Defaults to now.
    pub date: Option<String>,
    /// Brand codes or names to restrict to, e.g. ["IC", "EIC"]
    pub brands: Option<Vec<String>>,
    /// Only connections without changes
    pub direct: Option<bool>,
    /// Look up ticket prices for each connection
    pub include_prices: Option<bool>,
    /// Number of connections to return (default 5)
    pub length: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TrainRouteRequest {
    /// Brand code, e.g. "IC", "TLK", "REG"
    pub brand: String,
    /// Train number, e.g. "1306"
    pub train_number: String,
    /// ISO date the train runs on. Defaults to today.
    pub date: Option<String>,
    /// Use the nearest running date on or after `date` even if the train runs on `date`
    pub closest: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TrainIdRequest {
    /// Koleo train instance id
    pub train_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TrainCalendarRequest {
    /// Brand code, e.g. "IC"
    pub brand: String,
    /// Train number, e.g. "1306"
    pub train_number: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SeatStatsRequest {
    /// Brand code, e.g. "IC"
    pub brand: String,
    /// Train number; a non-numeric value matches the first train found
    pub train_number: String,
    /// Exactly two station names or slugs: [start_station, end_station]
    #[serde(default)]
    pub stations: Vec<String>,
    /// ISO date or datetime of travel. Defaults to now.
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SeatAvailabilityRequest {
    pub connection_id: i64,
    pub train_nr: i64,
    /// Koleo place type id
    pub place_type: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RealtimeRequest {
    /// Koleo train instance id, as returned by get_train_route
    pub train_id: i64,
    /// ISO operating day. Defaults to today.
    pub operating_day: Option<String>,
}
