//! Koleo HTTP client.
//!
//! Thin async wrapper over the public Koleo endpoints. Authentication is
//! either a stored session cookie map or an email/password login performed
//! once, on the first call that needs it.

use chrono::NaiveDate;
use reqwest::{
    Method, RequestBuilder, StatusCode,
    header::{COOKIE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::OnceCell;

use super::{KoleoApi, Result, error::KoleoError, types::*};
use crate::config::Config;

/// Default origin of the Koleo API.
pub const DEFAULT_BASE_URL: &str = "https://koleo.pl";

const API_VERSION: &str = "2";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize)]
struct Login {
    email: String,
    password: String,
}

/// Koleo API client.
#[derive(Debug)]
pub struct KoleoClient {
    http: reqwest::Client,
    base_url: String,
    login: Option<Login>,
    has_session_cookies: bool,
    signed_in: OnceCell<()>,
}

#[derive(Deserialize)]
struct StationSearch {
    stations: Vec<Station>,
}

#[derive(Deserialize)]
struct ConnectionPage {
    #[serde(default)]
    connections: Vec<Connection>,
}

#[derive(Deserialize)]
struct TrainCalendars {
    #[serde(default)]
    train_calendars: Vec<TrainCalendar>,
}

#[derive(Deserialize)]
struct ConnectionId {
    connection_id: i64,
}

#[derive(Serialize)]
struct ConnectionSearchBody {
    departure_station_id: i64,
    arrival_station_id: i64,
    departure_after: String,
    brand_ids: Vec<i64>,
    direct: bool,
    purchasable: bool,
}

impl KoleoClient {
    /// Build a client from configuration. No request is made here.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("x-koleo-version", HeaderValue::from_static(API_VERSION));

        let cookie = config.cookie_header();
        let has_session_cookies = cookie.is_some();
        if let Some(cookie) = cookie {
            let cookie = HeaderValue::from_str(&cookie).map_err(|_| KoleoError::Api {
                status: 0,
                message: "invalid auth cookie in configuration".to_string(),
            })?;
            headers.insert(COOKIE, cookie);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(config.timeout())
            .build()?;

        let login = match (&config.email, &config.password) {
            (Some(email), Some(password)) => Some(Login {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            http,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            login,
            has_session_cookies,
            signed_in: OnceCell::new(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "koleo request");
        self.http.request(method, url)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, resource: &str) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(KoleoError::NotFound {
                resource: resource.to_string(),
            });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(KoleoError::AuthRequired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(KoleoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| KoleoError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T> {
        self.execute(self.request(Method::GET, path), resource).await
    }

    /// Make sure authenticated calls carry a session.
    async fn ensure_signed_in(&self) -> Result<()> {
        match &self.login {
            Some(login) => self
                .signed_in
                .get_or_try_init(|| async {
                    tracing::info!("signing in to Koleo");
                    let request = self
                        .request(Method::POST, "/api/v2/main/sessions")
                        .json(login);
                    self.execute::<serde_json::Value>(request, "session")
                        .await
                        .map(|_| ())
                })
                .await
                .map(|_| ()),
            None if self.has_session_cookies => Ok(()),
            None => Err(KoleoError::AuthRequired),
        }
    }
}

#[async_trait::async_trait]
impl KoleoApi for KoleoClient {
    async fn find_station(&self, query: &str) -> Result<Vec<Station>> {
        let request = self
            .request(Method::GET, "/ls")
            .query(&[("q", query), ("language", "pl")]);
        let found: StationSearch = self
            .execute(request, &format!("stations matching '{query}'"))
            .await?;
        Ok(found.stations)
    }

    async fn get_stations(&self) -> Result<Vec<Station>> {
        self.get_json("/api/v2/main/stations", "station list").await
    }

    async fn get_station_by_slug(&self, slug: &str) -> Result<Station> {
        self.get_json(
            &format!("/api/v2/main/stations/by_slug/{slug}"),
            &format!("station '{slug}'"),
        )
        .await
    }

    async fn get_station_info_by_slug(&self, slug: &str) -> Result<StationInfo> {
        self.get_json(
            &format!("/api/v2/main/station_info/{slug}"),
            &format!("station info for '{slug}'"),
        )
        .await
    }

    async fn get_departures(&self, station_id: i64, date: NaiveDate) -> Result<Vec<BoardTrain>> {
        self.get_json(
            &format!(
                "/api/v2/main/timetables/{station_id}/{}/departures",
                date.format("%Y-%m-%d")
            ),
            &format!("departures for station {station_id}"),
        )
        .await
    }

    async fn get_arrivals(&self, station_id: i64, date: NaiveDate) -> Result<Vec<BoardTrain>> {
        self.get_json(
            &format!(
                "/api/v2/main/timetables/{station_id}/{}/arrivals",
                date.format("%Y-%m-%d")
            ),
            &format!("arrivals for station {station_id}"),
        )
        .await
    }

    async fn get_brands(&self) -> Result<Vec<Brand>> {
        self.get_json("/api/v2/main/brands", "brand list").await
    }

    async fn get_carriers(&self) -> Result<Vec<Carrier>> {
        self.get_json("/api/v2/main/carriers", "carrier list").await
    }

    async fn search_connections(&self, query: &ConnectionQuery) -> Result<Vec<Connection>> {
        let body = ConnectionSearchBody {
            departure_station_id: query.start_station_id,
            arrival_station_id: query.end_station_id,
            departure_after: query.departure_after.format("%Y-%m-%dT%H:%M:%S").to_string(),
            brand_ids: query.brand_ids.clone(),
            direct: query.direct,
            purchasable: false,
        };
        let request = self
            .request(Method::POST, "/api/v2/main/eol_connections/search")
            .json(&body);
        let page: ConnectionPage = self.execute(request, "connections").await?;
        Ok(page.connections)
    }

    async fn get_price(&self, connection_uuid: &str) -> Result<Option<Price>> {
        let path = format!("/api/v2/main/eol_connections/{connection_uuid}/price");
        match self.get_json(&path, "price").await {
            Err(KoleoError::NotFound { .. }) => Ok(None),
            other => other,
        }
    }

    async fn get_connection_id(&self, connection_uuid: &str) -> Result<i64> {
        let request = self.request(
            Method::POST,
            &format!("/api/v2/main/eol_connections/{connection_uuid}/connection_id"),
        );
        let id: ConnectionId = self
            .execute(request, &format!("connection {connection_uuid}"))
            .await?;
        Ok(id.connection_id)
    }

    async fn get_connection(&self, connection_id: i64) -> Result<ConnectionDetail> {
        self.get_json(
            &format!("/api/v2/main/connections/{connection_id}"),
            &format!("connection {connection_id}"),
        )
        .await
    }

    async fn get_seats_availability(
        &self,
        connection_id: i64,
        train_nr: i64,
        place_type: i64,
    ) -> Result<SeatAvailability> {
        self.get_json(
            &format!("/pl/seats_availability/{connection_id}/{train_nr}/{place_type}"),
            &format!("seat availability for connection {connection_id}, train {train_nr}"),
        )
        .await
    }

    async fn get_train_calendars(&self, brand: &str, number: i64) -> Result<Vec<TrainCalendar>> {
        let request = self
            .request(Method::GET, "/pl/train_calendars")
            .query(&[("brand", brand.to_string()), ("nr", number.to_string())]);
        let calendars: TrainCalendars = self
            .execute(request, &format!("train calendar for {brand} {number}"))
            .await?;
        Ok(calendars.train_calendars)
    }

    async fn get_train(&self, train_id: i64) -> Result<TrainDetail> {
        self.get_json(&format!("/pl/trains/{train_id}"), &format!("train {train_id}"))
            .await
    }

    async fn realtime_timetable(
        &self,
        train_id: i64,
        operating_day: NaiveDate,
    ) -> Result<RealtimeTimetable> {
        self.ensure_signed_in().await?;
        self.get_json(
            &format!(
                "/api/v2/main/train_timetable/{train_id}/{}",
                operating_day.format("%Y-%m-%d")
            ),
            &format!("realtime timetable for train {train_id}"),
        )
        .await
    }
}
