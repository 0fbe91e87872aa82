//! Station boards: departures, arrivals, and both merged in time order.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{ToolError, ToolOutput, links};
use crate::format::board::{summarize_all_trains, summarize_board};
use crate::koleo::{
    KoleoApi,
    slug::resolve_slug,
    types::{BoardTrain, Station},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    Departure,
    Arrival,
}

impl BoardKind {
    /// The timestamp that orders `train` on this kind of board.
    pub fn time_of(self, train: &BoardTrain) -> Option<&str> {
        match self {
            BoardKind::Departure => train.departure.as_deref(),
            BoardKind::Arrival => train.arrival.as_deref(),
        }
    }
}

/// A train on the merged board, tagged with why it is there.
#[derive(Debug, Clone, Serialize)]
pub struct BoardEntry {
    pub train: BoardTrain,
    #[serde(rename = "type")]
    pub kind: BoardKind,
}

/// Minute-precision ISO prefix the board timestamps are compared against.
pub fn cutoff(when: NaiveDateTime) -> String {
    when.format("%Y-%m-%dT%H:%M").to_string()
}

/// Keep trains whose relevant time is at or after `cutoff`.
///
/// Board timestamps are zero-padded ISO strings, so string order is time order.
pub fn not_earlier_than(trains: Vec<BoardTrain>, kind: BoardKind, cutoff: &str) -> Vec<BoardTrain> {
    trains
        .into_iter()
        .filter(|t| kind.time_of(t).unwrap_or("") >= cutoff)
        .collect()
}

/// Departures and arrivals after `cutoff`, in time order.
///
/// Ties keep departures before arrivals and otherwise the upstream order.
pub fn merge_board(departures: Vec<BoardTrain>, arrivals: Vec<BoardTrain>, cutoff: &str) -> Vec<BoardEntry> {
    let tag = |trains: Vec<BoardTrain>, kind: BoardKind| {
        not_earlier_than(trains, kind, cutoff)
            .into_iter()
            .map(move |train| BoardEntry { train, kind })
    };
    let mut merged: Vec<BoardEntry> = tag(departures, BoardKind::Departure)
        .chain(tag(arrivals, BoardKind::Arrival))
        .collect();
    merged.sort_by(|a, b| {
        let a = a.kind.time_of(&a.train).unwrap_or("");
        let b = b.kind.time_of(&b.train).unwrap_or("");
        a.cmp(b)
    });
    merged
}

async fn resolve_station(api: &dyn KoleoApi, station: &str) -> Result<Station, ToolError> {
    Ok(api.get_station_by_slug(&resolve_slug(station)).await?)
}

pub async fn get_departures(
    api: &dyn KoleoApi,
    station: &str,
    when: NaiveDateTime,
) -> Result<ToolOutput, ToolError> {
    single_board(api, station, when, BoardKind::Departure).await
}

pub async fn get_arrivals(
    api: &dyn KoleoApi,
    station: &str,
    when: NaiveDateTime,
) -> Result<ToolOutput, ToolError> {
    single_board(api, station, when, BoardKind::Arrival).await
}

async fn single_board(
    api: &dyn KoleoApi,
    station: &str,
    when: NaiveDateTime,
    kind: BoardKind,
) -> Result<ToolOutput, ToolError> {
    let station = resolve_station(api, station).await?;
    let date = when.date();
    let trains = match kind {
        BoardKind::Departure => api.get_departures(station.id, date).await?,
        BoardKind::Arrival => api.get_arrivals(station.id, date).await?,
    };
    let trains = not_earlier_than(trains, kind, &cutoff(when));

    let summary = summarize_board(
        &trains,
        &station.name,
        &when.format("%Y-%m-%d %H:%M").to_string(),
        kind,
    );
    let link = match kind {
        BoardKind::Departure => links::departures(&station.name_slug, date),
        BoardKind::Arrival => links::arrivals(&station.name_slug, date),
    };
    ToolOutput::new(&trains, summary, link)
}

/// Departures and arrivals merged into one board.
pub async fn get_all_trains(
    api: &dyn KoleoApi,
    station: &str,
    when: NaiveDateTime,
) -> Result<ToolOutput, ToolError> {
    let station = resolve_station(api, station).await?;
    let date = when.date();
    let (departures, arrivals) = tokio::try_join!(
        api.get_departures(station.id, date),
        api.get_arrivals(station.id, date)
    )?;

    let merged = merge_board(departures, arrivals, &cutoff(when));
    let summary = summarize_all_trains(
        &merged,
        &station.name,
        &when.format("%Y-%m-%d %H:%M").to_string(),
    );
    ToolOutput::new(
        &merged,
        summary,
        links::departures(&station.name_slug, date),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koleo::mock::{MockKoleo, arrival, departure, station};
    use crate::tools::parse_when;

    fn times(entries: &[BoardEntry]) -> Vec<(BoardKind, &str)> {
        entries
            .iter()
            .map(|e| (e.kind, e.kind.time_of(&e.train).unwrap()))
            .collect()
    }

    #[test]
    fn merge_filters_then_orders() {
        let merged = merge_board(
            vec![departure("2026-01-10T09:05", "IC 1", "A")],
            vec![
                arrival("2026-01-10T09:00", "IC 2", "B"),
                arrival("2026-01-10T09:10", "IC 3", "C"),
            ],
            "2026-01-10T09:01",
        );
        assert_eq!(
            times(&merged),
            vec![
                (BoardKind::Departure, "2026-01-10T09:05"),
                (BoardKind::Arrival, "2026-01-10T09:10"),
            ]
        );
    }

    #[test]
    fn merge_is_stable_on_equal_times() {
        let merged = merge_board(
            vec![
                departure("2026-01-10T09:05:00", "first", "A"),
                departure("2026-01-10T09:05:00", "second", "A"),
            ],
            vec![arrival("2026-01-10T09:05:00", "third", "B")],
            "2026-01-10T09:00",
        );
        let names: Vec<_> = merged
            .iter()
            .map(|e| e.train.train_full_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn cutoff_is_inclusive_at_minute_precision() {
        let when = parse_when("2026-01-10T09:05:45").unwrap();
        let kept = not_earlier_than(
            vec![
                departure("2026-01-10T09:04:59+01:00", "early", "A"),
                departure("2026-01-10T09:05:00+01:00", "on time", "A"),
            ],
            BoardKind::Departure,
            &cutoff(when),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].train_full_name.as_deref(), Some("on time"));
    }

    #[test]
    fn entries_serialize_with_type_tag() {
        let entry = BoardEntry {
            train: departure("2026-01-10T09:05", "IC 1", "A"),
            kind: BoardKind::Departure,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "departure");
        assert_eq!(value["train"]["train_full_name"], "IC 1");
    }

    fn krakow() -> MockKoleo {
        MockKoleo {
            stations: vec![station(7, "Kraków Główny", "krakow-glowny")],
            departures: vec![
                departure("2026-01-10T08:59:00", "REG 1", "Kraków Główny"),
                departure("2026-01-10T09:30:00", "IC 2", "Kraków Główny"),
            ],
            arrivals: vec![arrival("2026-01-10T09:15:00", "EIC 3", "Gdynia Główna")],
            ..MockKoleo::default()
        }
    }

    #[tokio::test]
    async fn departures_board() {
        let api = krakow();
        let when = parse_when("2026-01-10T09:00").unwrap();
        let output = get_departures(&api, "Kraków Główny", when).await.unwrap();

        assert_eq!(output.data.as_array().unwrap().len(), 1);
        assert_eq!(
            output.summary,
            "Kraków Główny -- Departures on 2026-01-10 09:00:\n2026-01-10T09:30  IC 2  (Kraków Główny)"
        );
        assert_eq!(
            output.koleo_url,
            "https://koleo.pl/dworzec-pkp/krakow-glowny/odjazdy/2026-01-10"
        );
        assert_eq!(
            api.calls(),
            vec!["get_station_by_slug krakow-glowny", "get_departures 7 2026-01-10"]
        );
    }

    #[tokio::test]
    async fn arrivals_board_links_to_arrivals() {
        let api = krakow();
        let when = parse_when("2026-01-10T09:00").unwrap();
        let output = get_arrivals(&api, "krakow-glowny", when).await.unwrap();
        assert_eq!(
            output.koleo_url,
            "https://koleo.pl/dworzec-pkp/krakow-glowny/przyjazdy/2026-01-10"
        );
        assert!(output.summary.contains("EIC 3"));
    }

    #[tokio::test]
    async fn all_trains_board() {
        let api = krakow();
        let when = parse_when("2026-01-10T09:00").unwrap();
        let output = get_all_trains(&api, "krakow-glowny", when).await.unwrap();

        let kinds: Vec<_> = output
            .data
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, vec!["arrival", "departure"]);
        assert_eq!(
            output.summary,
            "Kraków Główny -- all trains on 2026-01-10 09:00:\n  ARR 2026-01-10T09:15  EIC 3  (Gdynia Główna)\n  DEP 2026-01-10T09:30  IC 2  (Kraków Główny)"
        );
    }

    #[tokio::test]
    async fn merged_data_is_not_capped() {
        let api = MockKoleo {
            stations: vec![station(7, "Kraków Główny", "krakow-glowny")],
            departures: (0..30)
                .map(|i| departure(&format!("2026-01-10T10:{i:02}:00"), "REG", "A"))
                .collect(),
            ..MockKoleo::default()
        };
        let when = parse_when("2026-01-10T10:00").unwrap();
        let output = get_all_trains(&api, "krakow-glowny", when).await.unwrap();
        assert_eq!(output.data.as_array().unwrap().len(), 30);
        assert!(output.summary.ends_with("  ... and 10 more"));
    }
}
