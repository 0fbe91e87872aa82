//! Canned Koleo API for tool tests.
//!
//! Serves fixed records and records every call, so tests can assert both
//! on results and on what was (or was not) asked of the API.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;

use super::{KoleoApi, KoleoError, Result, types::*};

#[derive(Default)]
pub struct MockKoleo {
    pub stations: Vec<Station>,
    pub station_info: StationInfo,
    pub departures: Vec<BoardTrain>,
    pub arrivals: Vec<BoardTrain>,
    pub brands: Vec<Brand>,
    pub carriers: Vec<Carrier>,
    /// Served one page per `search_connections` call; empty once drained.
    pub connection_pages: Mutex<VecDeque<Vec<Connection>>>,
    pub prices: HashMap<String, Price>,
    pub connection_ids: HashMap<String, i64>,
    pub connection_details: HashMap<i64, ConnectionDetail>,
    pub seats: SeatAvailability,
    pub calendars: Vec<TrainCalendar>,
    pub trains: HashMap<i64, TrainDetail>,
    pub realtime: RealtimeTimetable,

    pub calls: Mutex<Vec<String>>,
    pub connection_queries: Mutex<Vec<ConnectionQuery>>,
}

impl MockKoleo {
    pub fn with_connection_pages(self, pages: Vec<Vec<Connection>>) -> Self {
        *self.connection_pages.lock().unwrap() = pages.into();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn connection_queries(&self) -> Vec<ConnectionQuery> {
        self.connection_queries.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

pub fn station(id: i64, name: &str, slug: &str) -> Station {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "name_slug": slug,
        "type": "rail",
        "country": "pl"
    }))
    .unwrap()
}

pub fn brand(id: i64, name: &str, logo_text: &str) -> Brand {
    serde_json::from_value(json!({ "id": id, "name": name, "logo_text": logo_text })).unwrap()
}

pub fn departure(at: &str, train: &str, from: &str) -> BoardTrain {
    serde_json::from_value(json!({
        "departure": at,
        "train_full_name": train,
        "stations": [{ "name": from }]
    }))
    .unwrap()
}

pub fn arrival(at: &str, train: &str, from: &str) -> BoardTrain {
    serde_json::from_value(json!({
        "arrival": at,
        "train_full_name": train,
        "stations": [{ "name": from }]
    }))
    .unwrap()
}

pub fn connection(uuid: &str, departure: &str, arrival: &str) -> Connection {
    serde_json::from_value(json!({
        "uuid": uuid,
        "departure": departure,
        "arrival": arrival,
        "duration": 90,
        "changes": 0,
        "legs": [{ "leg_type": "train_leg", "train_full_name": "IC 1306 SZTYGAR", "train_nr": 1306 }]
    }))
    .unwrap()
}

#[async_trait]
impl KoleoApi for MockKoleo {
    async fn find_station(&self, query: &str) -> Result<Vec<Station>> {
        self.record(format!("find_station {query}"));
        Ok(self.stations.clone())
    }

    async fn get_stations(&self) -> Result<Vec<Station>> {
        self.record("get_stations");
        Ok(self.stations.clone())
    }

    async fn get_station_by_slug(&self, slug: &str) -> Result<Station> {
        self.record(format!("get_station_by_slug {slug}"));
        self.stations
            .iter()
            .find(|s| s.name_slug == slug)
            .cloned()
            .ok_or_else(|| KoleoError::NotFound {
                resource: format!("station '{slug}'"),
            })
    }

    async fn get_station_info_by_slug(&self, slug: &str) -> Result<StationInfo> {
        self.record(format!("get_station_info_by_slug {slug}"));
        Ok(self.station_info.clone())
    }

    async fn get_departures(&self, station_id: i64, date: NaiveDate) -> Result<Vec<BoardTrain>> {
        self.record(format!("get_departures {station_id} {date}"));
        Ok(self.departures.clone())
    }

    async fn get_arrivals(&self, station_id: i64, date: NaiveDate) -> Result<Vec<BoardTrain>> {
        self.record(format!("get_arrivals {station_id} {date}"));
        Ok(self.arrivals.clone())
    }

    async fn get_brands(&self) -> Result<Vec<Brand>> {
        self.record("get_brands");
        Ok(self.brands.clone())
    }

    async fn get_carriers(&self) -> Result<Vec<Carrier>> {
        self.record("get_carriers");
        Ok(self.carriers.clone())
    }

    async fn search_connections(&self, query: &ConnectionQuery) -> Result<Vec<Connection>> {
        self.record("search_connections");
        self.connection_queries.lock().unwrap().push(query.clone());
        Ok(self
            .connection_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn get_price(&self, connection_uuid: &str) -> Result<Option<Price>> {
        self.record(format!("get_price {connection_uuid}"));
        Ok(self.prices.get(connection_uuid).cloned())
    }

    async fn get_connection_id(&self, connection_uuid: &str) -> Result<i64> {
        self.record(format!("get_connection_id {connection_uuid}"));
        self.connection_ids
            .get(connection_uuid)
            .copied()
            .ok_or_else(|| KoleoError::NotFound {
                resource: format!("connection {connection_uuid}"),
            })
    }

    async fn get_connection(&self, connection_id: i64) -> Result<ConnectionDetail> {
        self.record(format!("get_connection {connection_id}"));
        self.connection_details
            .get(&connection_id)
            .cloned()
            .ok_or_else(|| KoleoError::NotFound {
                resource: format!("connection {connection_id}"),
            })
    }

    async fn get_seats_availability(
        &self,
        connection_id: i64,
        train_nr: i64,
        place_type: i64,
    ) -> Result<SeatAvailability> {
        self.record(format!(
            "get_seats_availability {connection_id} {train_nr} {place_type}"
        ));
        Ok(self.seats.clone())
    }

    async fn get_train_calendars(&self, brand: &str, number: i64) -> Result<Vec<TrainCalendar>> {
        self.record(format!("get_train_calendars {brand} {number}"));
        Ok(self.calendars.clone())
    }

    async fn get_train(&self, train_id: i64) -> Result<TrainDetail> {
        self.record(format!("get_train {train_id}"));
        self.trains
            .get(&train_id)
            .cloned()
            .ok_or_else(|| KoleoError::NotFound {
                resource: format!("train {train_id}"),
            })
    }

    async fn realtime_timetable(
        &self,
        train_id: i64,
        operating_day: NaiveDate,
    ) -> Result<RealtimeTimetable> {
        self.record(format!("realtime_timetable {train_id} {operating_day}"));
        Ok(self.realtime.clone())
    }
}
