//! Koleo railway API adapter.
//!
//! [`KoleoApi`] is the capability set the tools are written against;
//! [`KoleoClient`] implements it over HTTP. Tests use the in-crate mock.

use async_trait::async_trait;
use chrono::NaiveDate;

mod client;
mod error;
#[cfg(test)]
pub mod mock;
pub mod slug;
pub mod types;

pub use client::KoleoClient;
pub use error::KoleoError;
use types::*;

pub type Result<T, E = KoleoError> = std::result::Result<T, E>;

/// Remote operations offered by the Koleo API.
///
/// Implementations must be safe for concurrent use by simultaneous tool calls.
#[async_trait]
pub trait KoleoApi: Send + Sync {
    /// Free-text station search.
    async fn find_station(&self, query: &str) -> Result<Vec<Station>>;

    /// Every station known to Koleo.
    async fn get_stations(&self) -> Result<Vec<Station>>;

    async fn get_station_by_slug(&self, slug: &str) -> Result<Station>;

    /// Address, opening hours and facilities.
    async fn get_station_info_by_slug(&self, slug: &str) -> Result<StationInfo>;

    async fn get_departures(&self, station_id: i64, date: NaiveDate) -> Result<Vec<BoardTrain>>;

    async fn get_arrivals(&self, station_id: i64, date: NaiveDate) -> Result<Vec<BoardTrain>>;

    async fn get_brands(&self) -> Result<Vec<Brand>>;

    async fn get_carriers(&self) -> Result<Vec<Carrier>>;

    /// One page of connections departing at or after `query.departure_after`.
    async fn search_connections(&self, query: &ConnectionQuery) -> Result<Vec<Connection>>;

    /// Price for a connection found by [`KoleoApi::search_connections`], if any.
    async fn get_price(&self, connection_uuid: &str) -> Result<Option<Price>>;

    /// Numeric connection id for a search result.
    async fn get_connection_id(&self, connection_uuid: &str) -> Result<i64>;

    async fn get_connection(&self, connection_id: i64) -> Result<ConnectionDetail>;

    async fn get_seats_availability(
        &self,
        connection_id: i64,
        train_nr: i64,
        place_type: i64,
    ) -> Result<SeatAvailability>;

    async fn get_train_calendars(&self, brand: &str, number: i64) -> Result<Vec<TrainCalendar>>;

    async fn get_train(&self, train_id: i64) -> Result<TrainDetail>;

    /// Actual vs scheduled times. Requires credentials.
    async fn realtime_timetable(
        &self,
        train_id: i64,
        operating_day: NaiveDate,
    ) -> Result<RealtimeTimetable>;
}
