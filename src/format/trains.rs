use super::{plain, slice};
use crate::koleo::types::{StopTime, TrainInfo, TrainStop};

fn format_time(time: Option<&StopTime>) -> String {
    match time {
        None => "     ".to_string(),
        Some(StopTime::Clock { hour, minute }) => format!("{hour:02}:{minute:02}"),
        Some(StopTime::Timestamp(raw)) if raw.is_empty() => "     ".to_string(),
        Some(StopTime::Timestamp(raw)) => slice(raw, 11, 16).to_string(),
    }
}

/// One stop line; `distance_m` is measured from the first stop.
pub fn format_stop(stop: &TrainStop, distance_m: f64) -> String {
    let arrival = format_time(stop.arrival.as_ref());
    let departure = format_time(stop.departure.as_ref());
    let name = stop
        .station_display_name
        .as_deref()
        .or(stop.station_name.as_deref())
        .unwrap_or("?");
    let platform = stop
        .platform
        .as_ref()
        .map(plain)
        .filter(|p| !p.is_empty())
        .map(|p| format!(" pl.{p}"))
        .unwrap_or_default();

    format!(
        "{:>6.1}km  {arrival} / {departure}  {name}{platform}",
        distance_m / 1000.0
    )
}

pub fn summarize_train_route(train: &TrainInfo, stops: &[TrainStop]) -> String {
    let mut lines = vec![
        train.train_full_name.as_deref().unwrap_or("?").to_string(),
        format!("  Runs: {}", train.run_desc.as_deref().unwrap_or("N/A")),
        format!("  {} stops:", stops.len()),
    ];
    let origin = stops.first().map(|s| s.distance).unwrap_or_default();
    lines.extend(
        stops
            .iter()
            .map(|stop| format!("  {}", format_stop(stop, stop.distance - origin))),
    );
    lines.join("\n")
}
