use serde_json::Value;

use super::{plain, prefix};
use crate::koleo::types::BoardTrain;
use crate::tools::board::{BoardEntry, BoardKind};

/// Board summaries list at most this many trains.
pub const BOARD_SUMMARY_LIMIT: usize = 20;

fn non_empty(value: &Option<Value>) -> Option<String> {
    value.as_ref().map(plain).filter(|s| !s.is_empty())
}

fn origin_label(train: &BoardTrain) -> &str {
    train.stations.first().map(|s| s.name.as_str()).unwrap_or("")
}

pub fn format_board_train(train: &BoardTrain, kind: BoardKind) -> String {
    let time = match kind.time_of(train) {
        Some(time) if !time.is_empty() => prefix(time, 16),
        _ => "??:??",
    };
    let name = train.train_full_name.as_deref().unwrap_or("");

    let mut position = String::new();
    if let Some(platform) = non_empty(&train.platform) {
        position.push_str(&format!(" pl.{platform}"));
    }
    if let Some(track) = non_empty(&train.track) {
        position.push_str(&format!("/{track}"));
    }

    format!("{time}  {name}  ({}){position}", origin_label(train))
}

pub fn summarize_board(trains: &[BoardTrain], station_name: &str, date: &str, kind: BoardKind) -> String {
    let label = match kind {
        BoardKind::Departure => "Departures",
        BoardKind::Arrival => "Arrivals",
    };
    let mut lines = vec![format!("{station_name} -- {label} on {date}:")];
    lines.extend(
        trains
            .iter()
            .take(BOARD_SUMMARY_LIMIT)
            .map(|train| format_board_train(train, kind)),
    );
    if trains.len() > BOARD_SUMMARY_LIMIT {
        lines.push(format!("  ... and {} more", trains.len() - BOARD_SUMMARY_LIMIT));
    }
    if trains.is_empty() {
        lines.push("  No trains found for this time.".to_string());
    }
    lines.join("\n")
}

pub fn summarize_all_trains(entries: &[BoardEntry], station_name: &str, date: &str) -> String {
    let mut lines = vec![format!("{station_name} -- all trains on {date}:")];
    for entry in entries.iter().take(BOARD_SUMMARY_LIMIT) {
        let time = prefix(entry.kind.time_of(&entry.train).unwrap_or(""), 16);
        let label = match entry.kind {
            BoardKind::Departure => "DEP",
            BoardKind::Arrival => "ARR",
        };
        let name = entry.train.train_full_name.as_deref().unwrap_or("");
        lines.push(format!(
            "  {label} {time}  {name}  ({})",
            origin_label(&entry.train)
        ));
    }
    if entries.len() > BOARD_SUMMARY_LIMIT {
        lines.push(format!("  ... and {} more", entries.len() - BOARD_SUMMARY_LIMIT));
    }
    lines.join("\n")
}
