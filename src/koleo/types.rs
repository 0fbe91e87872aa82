//! Koleo API response records.
//!
//! Every record keeps the fields this server reads as typed members and
//! carries everything else in a flattened `extra` map, so the structured
//! tool payload hands back the full upstream record.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Extra = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub name_slug: String,
    /// `rail`, `bus` or `group`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default)]
    pub opening_hours: Vec<OpeningHours>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHours {
    pub day: Value,
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub available: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A train on a station board, either departing or arriving.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardTrain {
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub train_full_name: Option<String>,
    #[serde(default)]
    pub platform: Option<Value>,
    #[serde(default)]
    pub track: Option<Value>,
    #[serde(default)]
    pub stations: Vec<StationRef>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRef {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub logo_text: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carrier {
    pub name: String,
    pub short_name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Query for one page of connections.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionQuery {
    pub start_station_id: i64,
    pub end_station_id: i64,
    pub brand_ids: Vec<i64>,
    pub departure_after: NaiveDateTime,
    pub direct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub uuid: String,
    pub departure: String,
    pub arrival: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub changes: i64,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Connection {
    /// Departure instant in the station's local time.
    pub fn departure_time(&self) -> Option<NaiveDateTime> {
        parse_koleo_time(&self.departure)
    }
}

pub const TRAIN_LEG: &str = "train_leg";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub leg_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_nr: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Leg {
    pub fn is_train(&self) -> bool {
        self.leg_type == TRAIN_LEG
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Price {
    pub price: Value,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDetail {
    pub id: i64,
    #[serde(default)]
    pub trains: Vec<ConnectionTrain>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionTrain {
    pub train_nr: i64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeatAvailability {
    #[serde(default)]
    pub seats: Vec<Seat>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Free,
    Reserved,
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub state: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Seat {
    pub fn seat_state(&self) -> SeatState {
        match self.state.as_str() {
            "FREE" => SeatState::Free,
            "RESERVED" => SeatState::Reserved,
            _ => SeatState::Blocked,
        }
    }
}

/// Occupancy counts over a seat list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeatCounts {
    pub total: usize,
    pub free: usize,
    pub reserved: usize,
    pub blocked: usize,
}

impl SeatAvailability {
    pub fn counts(&self) -> SeatCounts {
        self.seats
            .iter()
            .fold(SeatCounts::default(), |mut counts, seat| {
                counts.total += 1;
                match seat.seat_state() {
                    SeatState::Free => counts.free += 1,
                    SeatState::Reserved => counts.reserved += 1,
                    SeatState::Blocked => counts.blocked += 1,
                }
                counts
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainCalendar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_name: Option<String>,
    #[serde(default)]
    pub dates: Vec<NaiveDate>,
    /// `YYYY-MM-DD` → train instance id
    #[serde(default)]
    pub date_train_map: BTreeMap<String, i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl TrainCalendar {
    pub fn train_id_on(&self, date: NaiveDate) -> Option<i64> {
        self.date_train_map
            .get(&date.format("%Y-%m-%d").to_string())
            .copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainDetail {
    pub train: TrainInfo,
    #[serde(default)]
    pub stops: Vec<TrainStop>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_desc: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainStop {
    #[serde(default)]
    pub arrival: Option<StopTime>,
    #[serde(default)]
    pub departure: Option<StopTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_display_name: Option<String>,
    #[serde(default)]
    pub platform: Option<Value>,
    /// Cumulative distance in metres.
    #[serde(default)]
    pub distance: f64,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Stop times come either as a clock object or a full timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopTime {
    Clock {
        #[serde(default)]
        hour: u32,
        #[serde(default)]
        minute: u32,
    },
    Timestamp(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealtimeTimetable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_full_name: Option<String>,
    #[serde(default)]
    pub stops: Vec<RealtimeStop>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealtimeStop {
    pub station_id: i64,
    #[serde(default)]
    pub actual_departure: Option<String>,
    #[serde(default)]
    pub actual_arrival: Option<String>,
    #[serde(default)]
    pub aimed_departure: Option<String>,
    #[serde(default)]
    pub aimed_arrival: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Parse a Koleo timestamp into local wall-clock time.
///
/// Accepts RFC 3339 (offset dropped, local time kept) and naive
/// `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_koleo_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
